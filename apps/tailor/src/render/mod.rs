// Server-rendered pages for the upload form and the result view.
// Askama escapes every `{{ }}` value, so user text never reaches the markup raw.

use askama::Template;
use axum::response::Html;

/// Upload form, with an optional notice from a previous attempt.
#[derive(Template)]
#[template(
    source = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Resume Tailor</title>
<style>
body{font-family:system-ui,sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;line-height:1.5}
label{display:block;margin-top:1rem;font-weight:600}
input[type=text],input[type=url],textarea{width:100%;padding:.4rem;box-sizing:border-box}
textarea{min-height:10rem}
.notice{background:#fff3cd;border:1px solid #e0c36c;padding:.6rem 1rem;border-radius:4px}
.hint{color:#555;font-size:.9rem}
</style>
</head>
<body>
<h1>Resume Tailor</h1>
{% if let Some(notice) = notice %}<p class="notice" role="alert">{{ notice }}</p>
{% endif %}<form action="/tailor" method="post" enctype="multipart/form-data">
<label for="resumeFile">Resume (.docx, max {{ max_upload_mb }}MB)</label>
<input type="file" id="resumeFile" name="resumeFile" accept=".docx" required>
<label for="jobLink">Job posting link</label>
<input type="url" id="jobLink" name="jobLink" placeholder="https://">
<p class="hint">Leave the link empty to enter the job details by hand. Role and description are then required.</p>
<label for="jobRole">Job role</label>
<input type="text" id="jobRole" name="jobRole">
<label for="company">Company</label>
<input type="text" id="company" name="company">
<label for="jobDescription">Job description</label>
<textarea id="jobDescription" name="jobDescription"></textarea>
<p><button type="submit">Tailor my resume</button></p>
</form>
</body>
</html>
"##,
    ext = "html"
)]
pub struct IndexTemplate {
    pub notice: Option<String>,
    pub max_upload_mb: usize,
}

/// The tailored resume, shown as preformatted text.
#[derive(Template)]
#[template(
    source = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Tailored Resume</title>
<style>
body{font-family:system-ui,sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;line-height:1.5}
pre{white-space:pre-wrap;background:#f6f8fa;padding:1rem;border-radius:4px}
</style>
</head>
<body>
<h1>Your tailored resume</h1>
<pre id="tailored">{{ tailored_text }}</pre>
<p><a href="/">Tailor another</a></p>
</body>
</html>
"##,
    ext = "html"
)]
pub struct ResultTemplate {
    pub tailored_text: String,
}

pub fn index_page(
    notice: Option<String>,
    max_upload_mb: usize,
) -> Result<Html<String>, askama::Error> {
    let page = IndexTemplate {
        notice,
        max_upload_mb,
    };
    Ok(Html(page.render()?))
}

pub fn result_page(tailored_text: String) -> Result<Html<String>, askama::Error> {
    Ok(Html(ResultTemplate { tailored_text }.render()?))
}
