//! Static pages: the upload form.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Streakboard</title>
</head>
<body>
  <h1>Submit a streak screenshot</h1>
  <p>Upload a Mimo or Elevate streak screenshot to record it.</p>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept="image/*" required>
    <button type="submit">Upload</button>
  </form>
</body>
</html>
"#;

/// `GET /` — the upload form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
