//! Route handlers

use crate::error::ApiError;
use crate::upload::{read_upload, sanitize_file_name};
use crate::AppState;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use image::ImageOutputFormat;
use ply2web_core::MeshStats;
use serde::Deserialize;
use std::io::Cursor;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file_exchange";

const PAGE: &str = include_str!("page.html");

const MIN_FRAME_SIZE: u32 = 16;
const MAX_FRAME_SIZE: u32 = 4096;

/// View parameters for a rendered frame, relative to the reset camera
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub azimuth: f32,
    pub elevation: f32,
    pub zoom: f32,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            azimuth: 0.0,
            elevation: 0.0,
            zoom: 1.0,
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(PAGE)
}

pub async fn stats(State(state): State<AppState>) -> Json<Option<MeshStats>> {
    Json(state.plotter.lock().await.stats())
}

/// Render the scene to PNG
pub async fn render(
    State(state): State<AppState>,
    Query(view): Query<ViewQuery>,
) -> Result<Response, ApiError> {
    let plotter = state.plotter.clone().lock_owned().await;

    let png = tokio::task::spawn_blocking(move || {
        let [default_width, default_height] = plotter.config().window_size;
        let width = view.width.unwrap_or(default_width).clamp(MIN_FRAME_SIZE, MAX_FRAME_SIZE);
        let height = view.height.unwrap_or(default_height).clamp(MIN_FRAME_SIZE, MAX_FRAME_SIZE);

        let mut camera = plotter.camera().clone();
        camera.orbit(view.azimuth, view.elevation);
        if view.zoom.is_finite() {
            camera.zoom(view.zoom);
        }

        let image = plotter.render_with_camera(&camera, width, height);
        drop(plotter);

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageOutputFormat::Png)
            .map_err(|e| ApiError::Internal(format!("PNG encoding failed: {}", e)))?;
        Ok::<_, ApiError>(png.into_inner())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("render task failed: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    )
        .into_response())
}

/// Store the uploaded file, load it into the scene and reset the camera
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let file_name = sanitize_file_name(field.file_name());
            let bytes = field.bytes().await?;
            upload = Some((file_name, bytes));
            break;
        }
    }

    let (file_name, bytes) = match upload {
        Some((name, bytes)) if !bytes.is_empty() => (name, bytes),
        _ => return Ok(StatusCode::NO_CONTENT.into_response()),
    };
    log::info!("[load] {} ({} bytes)", file_name, bytes.len());

    let mesh = {
        let file_name = file_name.clone();
        tokio::task::spawn_blocking(move || read_upload(&file_name, &bytes))
            .await
            .map_err(|e| ApiError::Internal(format!("upload task failed: {}", e)))??
    };

    let mut plotter = state.plotter.lock().await;
    plotter.add_mesh_with_fallback(mesh, Some(&file_name));
    plotter.reset_camera();
    let stats = plotter.stats();
    if let Some(stats) = &stats {
        log::info!("{}: {}", file_name, stats);
    }

    Ok(Json(stats).into_response())
}
