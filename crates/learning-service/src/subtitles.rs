//! 字幕解析
//!
//! 将 SRT / WebVTT 文本解析为带时间轴的字幕条目，并支持按播放位置定位当前字幕。

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{LearningError, Result};

/// 时间轴行：`[H:]MM:SS(,|.)mmm --> [H:]MM:SS(,|.)mmm [cue settings]`，小时最多三位
static TIMING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(\d{1,3}):)?(\d{1,2}):(\d{2})[,.](\d{3})\s*-->\s*(?:(\d{1,3}):)?(\d{1,2}):(\d{2})[,.](\d{3})(?:\s+.*)?$",
    )
    .expect("timing regex is valid")
});

/// 字幕格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

/// 单条字幕
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// 从 1 开始的顺序号
    pub seq: i32,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
}

impl Cue {
    pub fn contains(&self, ms: i64) -> bool {
        self.start_ms <= ms && ms < self.end_ms
    }
}

/// 解析字幕文本
pub fn parse(format: SubtitleFormat, content: &str) -> Result<Vec<Cue>> {
    let content = content.trim_start_matches('\u{feff}');
    if content.trim().is_empty() {
        return Err(LearningError::Validation("字幕内容为空".to_string()));
    }

    let mut blocks = split_blocks(content).into_iter();

    if format == SubtitleFormat::Vtt {
        match blocks.next() {
            Some((_, lines)) if lines[0].trim_start().starts_with("WEBVTT") => {}
            Some((line, _)) => {
                return Err(LearningError::InvalidSubtitle {
                    line,
                    reason: "missing WEBVTT header".to_string(),
                });
            }
            None => return Err(LearningError::Validation("字幕内容为空".to_string())),
        }
    }

    let mut cues = Vec::new();
    for (first_line, lines) in blocks {
        if format == SubtitleFormat::Vtt && is_vtt_metadata(lines[0]) {
            continue;
        }

        // 时间轴位于第一行，或紧跟在序号 / cue id 之后
        let timing_idx = match lines.iter().position(|l| l.contains("-->")) {
            Some(idx) if idx <= 1 => idx,
            _ => {
                return Err(LearningError::InvalidSubtitle {
                    line: first_line,
                    reason: "missing timing line".to_string(),
                });
            }
        };

        let timing_line = first_line + timing_idx;
        let (start_ms, end_ms) =
            parse_timing(lines[timing_idx]).ok_or_else(|| LearningError::InvalidSubtitle {
                line: timing_line,
                reason: format!("malformed timing: {}", lines[timing_idx].trim()),
            })?;

        if end_ms < start_ms {
            return Err(LearningError::InvalidSubtitle {
                line: timing_line,
                reason: "cue ends before it starts".to_string(),
            });
        }

        let text = lines[timing_idx + 1..]
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        cues.push(Cue {
            seq: cues.len() as i32 + 1,
            start_ms,
            end_ms,
            text,
        });
    }

    if cues.is_empty() {
        return Err(LearningError::Validation("未找到任何字幕条目".to_string()));
    }

    Ok(cues)
}

/// 查找播放位置所在的字幕
pub fn cue_at(cues: &[Cue], ms: i64) -> Option<&Cue> {
    cues.iter().find(|cue| cue.contains(ms))
}

/// 按空行切分为块，返回每块首行的行号（从 1 开始）及内容
fn split_blocks(content: &str) -> Vec<(usize, Vec<&str>)> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start = 0;

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push((start, std::mem::take(&mut current)));
            }
            continue;
        }
        if current.is_empty() {
            start = idx + 1;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push((start, current));
    }

    blocks
}

fn is_vtt_metadata(first_line: &str) -> bool {
    let line = first_line.trim_start();
    line.starts_with("NOTE") || line.starts_with("STYLE") || line.starts_with("REGION")
}

fn parse_timing(line: &str) -> Option<(i64, i64)> {
    let caps = TIMING_REGEX.captures(line)?;
    // 小时可省略，其余分组必定存在
    let field = |i: usize| -> Option<i64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse::<i64>().ok(),
            None => Some(0),
        }
    };

    let start = to_ms(field(1)?, field(2)?, field(3)?, field(4)?)?;
    let end = to_ms(field(5)?, field(6)?, field(7)?, field(8)?)?;
    Some((start, end))
}

fn to_ms(hours: i64, minutes: i64, seconds: i64, millis: i64) -> Option<i64> {
    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)
}
