use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::video_info::video_info,
        crate::handlers::download::download,
    ),
    components(schemas(
        vidgate_core::VideoMetadata,
        vidgate_core::FormatDescriptor,
        crate::handlers::video_info::VideoInfoRequest,
        crate::handlers::video_info::VideoInfoResponse,
        crate::handlers::download::DownloadRequest,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video probing and streaming downloads")
    )
)]
pub struct ApiDoc;
