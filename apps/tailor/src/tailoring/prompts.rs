// Tailoring prompt. Built with `format!` so user text is inserted literally
// and never re-scanned for placeholders.

use std::fmt;

const ROLE_PLACEHOLDER: &str = "Not explicitly provided";
const COMPANY_PLACEHOLDER: &str = "Not specified";

/// Where the job description came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMethod {
    Url,
    Manual,
}

impl fmt::Display for SourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMethod::Url => f.write_str("URL"),
            SourceMethod::Manual => f.write_str("Manual"),
        }
    }
}

/// Resolved job details for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpecification {
    pub role: String,
    pub company: String,
    pub description: String,
    pub source: SourceMethod,
}

pub fn build_tailoring_prompt(resume_text: &str, job: &JobSpecification) -> String {
    let role = if job.role.is_empty() {
        ROLE_PLACEHOLDER
    } else {
        &job.role
    };
    let company = if job.company.is_empty() {
        COMPANY_PLACEHOLDER
    } else {
        &job.company
    };
    let description_marker = match job.source {
        SourceMethod::Url => " (Extracted from URL)",
        SourceMethod::Manual => "",
    };

    format!(
        r#"You are an expert resume writer and ATS (Applicant Tracking System) optimization specialist.
Your task is to tailor the following resume based on the provided job details to maximize the candidate's chances of getting an interview.

**Original Resume Text:**
```
{resume_text}
```

**Job Details:**
*   **Input Method:** {source}
*   **Job Role:** {role}
*   **Company:** {company}
*   **Job Description/Context:**{description_marker}
    ```
    {description}
    ```

**Instructions:**
1.  Analyze: Identify the key skills, qualifications, and keywords the job details emphasize.
2.  Tailor: Rewrite the summary, experience, and skills sections to foreground the candidate's most relevant experience. Reorder content where that helps. Never invent employers, titles, dates, degrees, or achievements that are not in the original resume.
3.  ATS Optimization: Use the job's own terminology where the candidate's experience genuinely supports it. Keep headings conventional and the layout plain text.
4.  Quantify: Keep and sharpen every metric already present in the resume. Do not fabricate numbers.
5.  Tone: Professional, concise, and active voice.
6.  Output: Provide only the full text of the *tailored* resume. Do not include explanations or conversational text.

**Tailored Resume Output:**
"#,
        source = job.source,
        description = job.description,
    )
}
