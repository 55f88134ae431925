//! The processing pipeline: normalize → vision → OCR → ledger.
//!
//! Strictly sequential: each outbound call is awaited before the next one
//! starts, and any failure is terminal for the request. No retries, no
//! background work.

use std::path::Path;

use tracing::info;

use streakboard_core::{Extraction, LedgerReport, StreakError};

use crate::server::AppState;

/// Everything a caller needs to answer the uploader.
pub struct PipelineOutcome {
    pub extraction: Extraction,
    /// Raw OCR text, or a tagged "OCR processing error: ..." string.
    pub ocr_text: String,
    pub report: LedgerReport,
}

/// Run the full pipeline on the image at `path`.
///
/// The OCR pass is informational only: its output rides along in the
/// outcome but never decides whether the ledger write happens.
pub async fn process_image(
    state: &AppState,
    path: &Path,
) -> Result<PipelineOutcome, StreakError> {
    let jpeg_path = media::normalize_to_jpeg(path)?;

    let vision = state.vision.as_ref().ok_or_else(|| {
        StreakError::Config("VISION_ENDPOINT / VISION_API_KEY not set".to_string())
    })?;
    let extraction = vision.extract(&jpeg_path).await?;
    info!(
        "[Pipeline] Extracted name={} platform={} streak={}",
        extraction.name, extraction.platform, extraction.streak
    );

    let ocr_text = state.ocr.extract_text(&jpeg_path).await;

    let ledger = state
        .ledger
        .as_ref()
        .ok_or_else(|| StreakError::Config("SPREADSHEET_ID not set".to_string()))?;
    let report = ledger.record(&extraction).await?;

    Ok(PipelineOutcome {
        extraction,
        ocr_text,
        report,
    })
}
