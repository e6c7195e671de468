use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::media::models::MediaItem;
use crate::features::media::{dtos as media_dtos, handlers as media_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Media
        media_handlers::media_handler::list_media,
        media_handlers::media_handler::upload_media,
        media_handlers::media_handler::delete_media,
    ),
    components(
        schemas(
            MediaItem,
            media_dtos::MediaListResponseDto,
            media_dtos::UploadMediaDto,
            media_dtos::UploadResponseDto,
            media_dtos::DeleteResponseDto,
        )
    ),
    tags(
        (name = "media", description = "Media asset listing, upload and deletion"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Media Gateway API",
        version = "0.1.0",
        description = "API documentation for the media gateway",
    )
)]
pub struct ApiDoc;

/// Adds Bearer security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
