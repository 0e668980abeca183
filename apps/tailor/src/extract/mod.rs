// Plain-text extraction from the two inputs: the uploaded resume and the job posting page.
// Both extractors log their own failures and hand back `None`.

pub mod docx;
pub mod web;
