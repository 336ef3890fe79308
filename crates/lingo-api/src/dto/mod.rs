//! DTO 模块
//!
//! 包含所有请求和响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    ContentFilter, CreateArticleRequest, CreateBookRequest, CreateCardRequest,
    CreateEpisodeRequest, CreateHighlightRequest, CreateNoteRequest, CreatePodcastRequest,
    CreateSeasonRequest, CreateVideoRequest, CreateVocabularyRequest, DailyActivityCronQuery,
    DueCardsQuery, HistoryQuery, LoginRequest, NoteFilter, PaginationParams, RegisterRequest,
    ReviewCardRequest, SubscribeRequest, SubtitleAtQuery, SubtitleQuery, TrackActivityRequest,
    UnsubscribeRequest, UpdateArticleRequest, UpdateBookRequest, UpdateCardRequest,
    UpdateGuideRequest, UpdateNoteRequest, UpdatePodcastRequest, UpdateProfileRequest,
    UpdateVideoRequest, UploadSubtitlesRequest, VideoFilter, VocabularyQuery,
    VocabularyToCardRequest,
};

pub use response::{
    ApiResponse, AuthResponse, BookDetail, DashboardResponse, GuideResponse, PageResponse,
    RefreshResponse, SeasonDetail, StreakResponse, SubtitleAtResponse, SubtitleImportResult,
    VapidPublicKeyResponse, VideoDetail,
};
