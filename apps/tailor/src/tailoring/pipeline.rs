//! Request orchestration: upload -> job details -> resume text -> AI -> result.
//!
//! Every early return drops the `ScratchUpload`, so the scratch file is gone
//! before `run` returns, whichever step stopped the request.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::extract::docx::extract_docx_text;
use crate::extract::web::JobPageFetcher;
use crate::llm_client::{self, TextGenerator};
use crate::tailoring::error::TailorError;
use crate::tailoring::prompts::{build_tailoring_prompt, JobSpecification, SourceMethod};
use crate::tailoring::upload::{validate_upload, ScratchUpload, UploadedFile, ValidUpload};

const ACCEPTED_URL_SCHEMES: &[&str] = &["http://", "https://"];

/// Job fields exactly as submitted; empty string when absent.
#[derive(Debug, Clone, Default)]
pub struct JobForm {
    pub job_link: String,
    pub job_role: String,
    pub company: String,
    pub job_description: String,
}

/// One form submission.
#[derive(Debug, Clone, Default)]
pub struct TailorSubmission {
    pub resume: Option<UploadedFile>,
    pub job: JobForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailoredResume {
    pub text: String,
    pub source: SourceMethod,
}

/// Runs tailoring requests. Holds no per-request state.
pub struct Tailor {
    upload_dir: PathBuf,
    job_pages: Arc<dyn JobPageFetcher>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Tailor {
    pub fn new(
        upload_dir: PathBuf,
        job_pages: Arc<dyn JobPageFetcher>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            upload_dir,
            job_pages,
            generator,
        }
    }

    pub fn ai_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn run(&self, submission: TailorSubmission) -> Result<TailoredResume, TailorError> {
        let upload = validate_upload(submission.resume)?;
        let scratch = self.persist(upload).await?;

        let job = self.resolve_job(submission.job).await?;
        let resume_text = self.extract_resume(&scratch).await?;

        let prompt = build_tailoring_prompt(&resume_text, &job);
        let tailored = self.call_ai(prompt).await?;

        drop(scratch);

        if tailored.trim().is_empty() {
            error!("AI call ok but tailored text was empty");
            return Err(TailorError::NoContent);
        }
        info!("AI call successful, rendering result");
        Ok(TailoredResume {
            text: tailored,
            source: job.source,
        })
    }

    async fn persist(&self, upload: ValidUpload) -> Result<ScratchUpload, TailorError> {
        let dir = self.upload_dir.clone();
        let filename = upload.safe_name.clone();
        let saved = tokio::task::spawn_blocking(move || ScratchUpload::persist(&dir, &upload))
            .await
            .map_err(|e| TailorError::Unexpected(format!("saving upload: {e}")))?;
        saved.map_err(|e| {
            error!("Error saving uploaded file {filename}: {e}");
            TailorError::SaveFailed(e)
        })
    }

    async fn resolve_job(&self, form: JobForm) -> Result<JobSpecification, TailorError> {
        let job_link = form.job_link.trim();
        let role = form.job_role.trim().to_string();
        let company = form.company.trim().to_string();

        if !job_link.is_empty() {
            if !ACCEPTED_URL_SCHEMES
                .iter()
                .any(|scheme| job_link.starts_with(scheme))
            {
                warn!("Rejected job link without http(s) scheme: {job_link}");
                return Err(TailorError::InvalidJobLink);
            }
            let description = self
                .job_pages
                .fetch_job_text(job_link)
                .await
                .ok_or(TailorError::JobLinkExtraction)?;
            return Ok(JobSpecification {
                role,
                company,
                description,
                source: SourceMethod::Url,
            });
        }

        let description = form.job_description.trim().to_string();
        if role.is_empty() || description.is_empty() {
            return Err(TailorError::MissingJobFields);
        }
        Ok(JobSpecification {
            role,
            company,
            description,
            source: SourceMethod::Manual,
        })
    }

    async fn extract_resume(&self, scratch: &ScratchUpload) -> Result<String, TailorError> {
        let path = scratch.path().to_path_buf();
        let text = tokio::task::spawn_blocking(move || extract_docx_text(&path))
            .await
            .map_err(|e| {
                error!("Unexpected error extracting resume text: {e}");
                TailorError::Unexpected(format!("resume extraction: {e}"))
            })?;

        match text {
            Some(t) if !t.trim().is_empty() => Ok(t),
            _ => Err(TailorError::UnreadableResume),
        }
    }

    async fn call_ai(&self, prompt: String) -> Result<String, TailorError> {
        let generator = self.generator.clone();
        let call =
            tokio::spawn(async move { llm_client::complete(generator.as_deref(), &prompt).await });
        match call.await {
            Ok(result) => Ok(result?),
            Err(e) => {
                error!("Unexpected error during AI call: {e}");
                Err(TailorError::Unexpected(format!("AI call: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tailoring::error::ErrorKind;
    use crate::test_support::{dir_entry_count, docx_bytes, StubGenerator, StubJobPages};
    use bytes::Bytes;

    struct Harness {
        dir: tempfile::TempDir,
        pages: Arc<StubJobPages>,
        generator: Option<Arc<StubGenerator>>,
    }

    impl Harness {
        fn new(pages: StubJobPages, generator: Option<StubGenerator>) -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                pages: Arc::new(pages),
                generator: generator.map(Arc::new),
            }
        }

        fn tailor(&self) -> Tailor {
            Tailor::new(
                self.dir.path().to_path_buf(),
                self.pages.clone(),
                self.generator
                    .clone()
                    .map(|g| g as Arc<dyn TextGenerator>),
            )
        }

        fn ai_calls(&self) -> usize {
            self.generator.as_ref().map_or(0, |g| g.call_count())
        }

        fn scratch_files(&self) -> usize {
            dir_entry_count(self.dir.path())
        }
    }

    fn resume(paragraphs: &[&str]) -> Option<UploadedFile> {
        Some(UploadedFile {
            filename: "resume.docx".to_string(),
            data: Bytes::from(docx_bytes(paragraphs)),
        })
    }

    fn manual(role: &str, description: &str) -> JobForm {
        JobForm {
            job_role: role.to_string(),
            job_description: description.to_string(),
            ..Default::default()
        }
    }

    fn linked(link: &str) -> JobForm {
        JobForm {
            job_link: link.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_manual_submission_end_to_end() {
        let h = Harness::new(
            StubJobPages::failing(),
            Some(StubGenerator::text("Tailored: John Doe")),
        );
        let result = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: manual("Backend Engineer", "Build APIs"),
            })
            .await
            .unwrap();

        assert_eq!(result.text, "Tailored: John Doe");
        assert_eq!(result.source, SourceMethod::Manual);
        let prompt = h.generator.as_ref().unwrap().last_prompt().unwrap();
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("John Doe"));
        assert!(prompt.contains("Build APIs"));
        assert_eq!(h.pages.call_count(), 0);
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_link_without_scheme_rejected_before_fetch() {
        let h = Harness::new(StubJobPages::returning("job"), Some(StubGenerator::text("x")));
        let err = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: linked("not-a-url"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TailorError::InvalidJobLink));
        assert_eq!(h.pages.call_count(), 0);
        assert_eq!(h.ai_calls(), 0);
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_invalid_credential_surfaces_category_message() {
        let h = Harness::new(
            StubJobPages::failing(),
            Some(StubGenerator::failing(
                "400 Bad Request: API key not valid. Please pass a valid API key.",
            )),
        );
        let err = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: manual("Backend Engineer", "Build APIs"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Authentication Error: Invalid API key.");
        assert_eq!(err.kind(), ErrorKind::AiService);
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_failed_link_extraction_skips_ai() {
        let h = Harness::new(StubJobPages::failing(), Some(StubGenerator::text("x")));
        let err = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: linked("https://jobs.example.com/123"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TailorError::JobLinkExtraction));
        assert_eq!(h.pages.call_count(), 1);
        assert_eq!(h.ai_calls(), 0);
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_link_success_keeps_manual_role_and_company() {
        let h = Harness::new(
            StubJobPages::returning("Scraped posting body"),
            Some(StubGenerator::text("done")),
        );
        let result = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["Jane Roe"]),
                job: JobForm {
                    job_link: "  http://jobs.example.com/9  ".to_string(),
                    job_role: "SRE".to_string(),
                    company: "Initech".to_string(),
                    job_description: "ignored manual text".to_string(),
                },
            })
            .await
            .unwrap();

        assert_eq!(result.source, SourceMethod::Url);
        let prompt = h.generator.as_ref().unwrap().last_prompt().unwrap();
        assert!(prompt.contains("Scraped posting body"));
        assert!(prompt.contains("**Job Role:** SRE"));
        assert!(prompt.contains("**Company:** Initech"));
        assert!(!prompt.contains("ignored manual text"));
    }

    #[tokio::test]
    async fn test_manual_requires_role_and_description() {
        let h = Harness::new(StubJobPages::failing(), Some(StubGenerator::text("x")));
        for job in [manual("", "Build APIs"), manual("Engineer", "   "), JobForm::default()] {
            let err = h
                .tailor()
                .run(TailorSubmission {
                    resume: resume(&["John Doe"]),
                    job,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, TailorError::MissingJobFields));
        }
        assert_eq!(h.ai_calls(), 0);
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_ai_call() {
        let h = Harness::new(StubJobPages::failing(), None);
        let tailor = h.tailor();
        assert!(!tailor.ai_configured());

        let err = tailor
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: manual("Engineer", "Build APIs"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert_eq!(err.to_string(), "API Key not configured.");
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_disallowed_extension_never_touches_disk() {
        let h = Harness::new(StubJobPages::failing(), Some(StubGenerator::text("x")));
        let err = h
            .tailor()
            .run(TailorSubmission {
                resume: Some(UploadedFile {
                    filename: "resume.pdf".to_string(),
                    data: Bytes::from_static(b"%PDF-1.4"),
                }),
                job: manual("Engineer", "Build APIs"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TailorError::UnsupportedFileType));
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_and_blank_resumes_rejected() {
        let h = Harness::new(StubJobPages::failing(), Some(StubGenerator::text("x")));
        let corrupt = Some(UploadedFile {
            filename: "resume.docx".to_string(),
            data: Bytes::from_static(b"not a docx"),
        });
        for upload in [corrupt, resume(&["", "   "])] {
            let err = h
                .tailor()
                .run(TailorSubmission {
                    resume: upload,
                    job: manual("Engineer", "Build APIs"),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, TailorError::UnreadableResume));
        }
        assert_eq!(h.ai_calls(), 0);
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_blocked_prompt_reports_reason() {
        let h = Harness::new(
            StubJobPages::failing(),
            Some(StubGenerator::blocked_with_text("SAFETY", "partial")),
        );
        let err = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: manual("Engineer", "Build APIs"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "AI request blocked: SAFETY. Review inputs.");
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_reply_is_no_content() {
        let h = Harness::new(StubJobPages::failing(), Some(StubGenerator::text("  \n ")));
        let err = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: manual("Engineer", "Build APIs"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TailorError::NoContent));
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_generator_panic_becomes_unexpected_error() {
        let h = Harness::new(StubJobPages::failing(), Some(StubGenerator::panicking()));
        let err = h
            .tailor()
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: manual("Engineer", "Build APIs"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(
            err.to_string(),
            "An unexpected error occurred. Please try again."
        );
        assert_eq!(h.scratch_files(), 0);
    }

    #[tokio::test]
    async fn test_saving_into_missing_directory_fails() {
        let h = Harness::new(StubJobPages::failing(), Some(StubGenerator::text("x")));
        let tailor = Tailor::new(h.dir.path().join("missing"), h.pages.clone(), None);
        let err = tailor
            .run(TailorSubmission {
                resume: resume(&["John Doe"]),
                job: manual("Engineer", "Build APIs"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TailorError::SaveFailed(_)));
        assert_eq!(err.to_string(), "Error saving uploaded file.");
    }
}
