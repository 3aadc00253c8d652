use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Swatchwise.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::palettes::generate,
        crate::routes::palettes::liked_palettes,
        crate::routes::feedback::submit_feedback,
        crate::routes::upload::upload,
        crate::routes::harmony::generate_harmony,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::palette::GenerateResponse,
            crate::dto::palette::LikedPalette,
            crate::dto::feedback::FeedbackKind,
            crate::dto::feedback::FeedbackRequest,
            crate::dto::feedback::ActionResponse,
            crate::dto::upload::UploadForm,
            crate::dto::upload::UploadResponse,
            crate::dto::upload::UploadProba,
            crate::dto::upload::PendingScore,
            crate::dto::harmony::HarmonyRequest,
            crate::dto::harmony::HarmonyResponse,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "palettes", description = "Palette generation and listing"),
        (name = "feedback", description = "Likes and dislikes that train the preference model"),
    )
)]
/// OpenAPI document for every public route.
pub struct ApiDoc;
