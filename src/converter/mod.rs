mod resolve;
mod runner;

pub use resolve::{fallback_candidates, resolve_executable_path, PANDOC_PATH_ENV};
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner};

use crate::error::{AppError, Result};
use clap::ValueEnum;
use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Formats pandoc is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Docx,
    Pdf,
    Html,
    Epub,
    Odt,
    Txt,
    Rst,
    Json,
    Latex,
    Xml,
    Pptx,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
            OutputFormat::Epub => "epub",
            OutputFormat::Odt => "odt",
            OutputFormat::Txt => "txt",
            OutputFormat::Rst => "rst",
            OutputFormat::Json => "json",
            OutputFormat::Latex => "tex",
            OutputFormat::Xml => "xml",
            OutputFormat::Pptx => "pptx",
        }
    }
}

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "md", "markdown", "docx", "pdf", "html", "htm", "epub", "odt", "txt", "rst", "json", "tex",
    "latex", "xml", "pptx",
];

pub fn supports_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

pub fn supported_extensions() -> Vec<&'static str> {
    SUPPORTED_EXTENSIONS.to_vec()
}

/// Style preset for the paste-HTML workflow. Each preset maps to a fixed set
/// of extra pandoc flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StylePreset {
    #[default]
    Simple,
    Academic,
    Business,
    Technical,
}

impl StylePreset {
    /// Unrecognized names fall back to the simple preset.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "academic" => StylePreset::Academic,
            "business" => StylePreset::Business,
            "technical" => StylePreset::Technical,
            _ => StylePreset::Simple,
        }
    }

    pub fn pandoc_args(self) -> Vec<OsString> {
        let mut args = vec![OsString::from("--standalone")];
        match self {
            StylePreset::Academic => {
                args.push(OsString::from("--toc"));
                args.push(OsString::from("--number-sections"));
            }
            StylePreset::Technical => {
                args.push(OsString::from("--highlight-style"));
                args.push(OsString::from("pygments"));
            }
            StylePreset::Simple | StylePreset::Business => {}
        }
        args
    }
}

/// A single file-to-file conversion.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Word reference document whose styles are copied onto the output.
    /// Only meaningful when the output is a .docx file.
    pub reference_doc: Option<PathBuf>,
}

/// Classified result of a conversion. Every failure mode collapses into the
/// `Failure` case; callers never see an error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Success { message: String },
    Failure { diagnostic: String },
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            ConversionOutcome::Success { message } => message,
            ConversionOutcome::Failure { diagnostic } => diagnostic,
        }
    }
}

impl From<AppError> for ConversionOutcome {
    fn from(err: AppError) -> Self {
        // Process diagnostics pass through verbatim; the remaining kinds
        // render through their Display text.
        let diagnostic = match err {
            AppError::ExternalProcess(text) | AppError::Unclassified(text) => text,
            other => other.to_string(),
        };
        ConversionOutcome::Failure { diagnostic }
    }
}

/// Drives the external pandoc executable.
pub struct PandocConverter {
    pandoc_path: Option<PathBuf>,
    runner: Arc<dyn ProcessRunner>,
}

impl PandocConverter {
    /// Resolves the executable from `PANDOC_PATH` and the platform
    /// fallbacks.
    pub fn new() -> Self {
        let pandoc_path = resolve_executable_path(
            None,
            std::env::var_os(PANDOC_PATH_ENV).as_ref(),
            &fallback_candidates(),
        );
        Self {
            pandoc_path,
            runner: Arc::new(SystemRunner),
        }
    }

    pub fn with_pandoc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pandoc_path = Some(path.into());
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn pandoc_path(&self) -> Option<&Path> {
        self.pandoc_path.as_deref()
    }

    /// Probe the executable with `--version`.
    pub async fn is_available(&self) -> bool {
        self.version().await.is_some()
    }

    /// First line of `pandoc --version` output, when the probe succeeds.
    pub async fn version(&self) -> Option<String> {
        let pandoc = self.pandoc_path.as_deref()?;
        let output = self
            .runner
            .run(pandoc, &[OsString::from("--version")])
            .await
            .ok()
            .filter(|output| output.success)?;
        output.stdout.lines().next().map(str::to_string)
    }

    pub async fn convert(&self, request: &ConversionRequest) -> ConversionOutcome {
        match self.try_convert(request).await {
            Ok(message) => ConversionOutcome::Success { message },
            Err(err) => err.into(),
        }
    }

    pub async fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        reference_doc: Option<&Path>,
    ) -> ConversionOutcome {
        self.convert(&ConversionRequest {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            reference_doc: reference_doc.map(Path::to_path_buf),
        })
        .await
    }

    /// Convert raw HTML content to a .docx file. Bare fragments are wrapped
    /// in a standalone HTML skeleton first, written to a transient file that
    /// is deleted (best-effort) once pandoc exits.
    pub async fn convert_html_to_docx(
        &self,
        html: &str,
        output: &Path,
        preset: StylePreset,
    ) -> ConversionOutcome {
        match self.try_convert_html(html, output, preset).await {
            Ok(message) => ConversionOutcome::Success { message },
            Err(err) => err.into(),
        }
    }

    async fn try_convert(&self, request: &ConversionRequest) -> Result<String> {
        let pandoc = self.checked_executable()?;

        if !request.input.exists() {
            return Err(AppError::NotFound(format!(
                "input file does not exist: {}",
                request.input.display()
            )));
        }

        let args = build_convert_args(
            &request.input,
            &request.output,
            request.reference_doc.as_deref(),
        );

        info!(
            "Converting {} to {}",
            request.input.display(),
            request.output.display()
        );
        self.run_pandoc(&pandoc, &args).await?;

        Ok(success_message(&request.output))
    }

    async fn try_convert_html(
        &self,
        html: &str,
        output: &Path,
        preset: StylePreset,
    ) -> Result<String> {
        let pandoc = self.checked_executable()?;

        let document = ensure_standalone_html(html);

        // Unique per call so concurrent conversions never share a transient
        // file. Dropping the handle deletes it, ignoring errors.
        let transient = tempfile::Builder::new()
            .prefix("docmill-")
            .suffix(".html")
            .tempfile()?;
        tokio::fs::write(transient.path(), document.as_bytes()).await?;

        let mut args: Vec<OsString> = vec![
            transient.path().as_os_str().to_owned(),
            OsString::from("-o"),
            output.as_os_str().to_owned(),
        ];
        args.extend(preset.pandoc_args());

        info!("Converting pasted HTML to {}", output.display());
        self.run_pandoc(&pandoc, &args).await?;

        Ok(success_message(output))
    }

    fn checked_executable(&self) -> Result<PathBuf> {
        let pandoc = self.pandoc_path.clone().ok_or(AppError::Configuration)?;
        if !pandoc.exists() {
            return Err(AppError::NotFound(format!(
                "pandoc executable does not exist: {}",
                pandoc.display()
            )));
        }
        Ok(pandoc)
    }

    async fn run_pandoc(&self, pandoc: &Path, args: &[OsString]) -> Result<ProcessOutput> {
        let output = self
            .runner
            .run(pandoc, args)
            .await
            .map_err(|e| AppError::Unclassified(e.to_string()))?;

        if !output.success {
            let stderr = output.stderr.trim();
            let diagnostic = if stderr.is_empty() {
                match output.code {
                    Some(code) => format!("pandoc exited with status {code}"),
                    None => "pandoc terminated by signal".to_string(),
                }
            } else {
                stderr.to_string()
            };
            return Err(AppError::ExternalProcess(diagnostic));
        }

        Ok(output)
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Argument vector for a file conversion: `<input> -o <output>`, plus
/// `--reference-doc <template>` when a template is given and the output is a
/// .docx file. For any other output format the template is a no-op.
pub fn build_convert_args(
    input: &Path,
    output: &Path,
    reference_doc: Option<&Path>,
) -> Vec<OsString> {
    let mut args = vec![
        input.as_os_str().to_owned(),
        OsString::from("-o"),
        output.as_os_str().to_owned(),
    ];

    if let Some(template) = reference_doc {
        if is_docx_output(output) {
            args.push(OsString::from("--reference-doc"));
            args.push(template.as_os_str().to_owned());
        }
    }

    args
}

fn is_docx_output(output: &Path) -> bool {
    output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}

/// Wrap an HTML fragment in a full document skeleton unless it already is
/// one (leading whitespace and case are ignored).
pub fn ensure_standalone_html(content: &str) -> Cow<'_, str> {
    let head: String = content
        .trim_start()
        .chars()
        .take("<!doctype".len())
        .collect::<String>()
        .to_ascii_lowercase();

    if head.starts_with("<!doctype") || head.starts_with("<html") {
        return Cow::Borrowed(content);
    }

    Cow::Owned(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Document</title>\n\
         </head>\n\
         <body>\n\
         {content}\n\
         </body>\n\
         </html>"
    ))
}

fn success_message(output: &Path) -> String {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!("Converted successfully: {name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every invocation and replies with a canned result.
    struct MockRunner {
        calls: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
        response: ProcessOutput,
    }

    impl MockRunner {
        fn exiting(success: bool, code: i32, stderr: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                response: ProcessOutput {
                    success,
                    code: Some(code),
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                },
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_call(&self) -> (PathBuf, Vec<OsString>) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ProcessRunner for MockRunner {
        async fn run(
            &self,
            program: &Path,
            args: &[OsString],
        ) -> std::io::Result<ProcessOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_path_buf(), args.to_vec()));
            Ok(self.response.clone())
        }
    }

    fn converter_with(
        pandoc_path: Option<PathBuf>,
        runner: Arc<MockRunner>,
    ) -> PandocConverter {
        let mut converter = PandocConverter::new().with_runner(runner);
        converter.pandoc_path = pandoc_path;
        converter
    }

    /// Tempdir with a fake pandoc binary and a sample input file.
    fn sandbox() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("pandoc");
        std::fs::write(&exe, b"").unwrap();
        let input = dir.path().join("a.md");
        std::fs::write(&input, b"# hello").unwrap();
        (dir, exe, input)
    }

    #[test]
    fn reference_doc_skipped_for_non_docx_output() {
        let args = build_convert_args(
            Path::new("a.md"),
            Path::new("a.pdf"),
            Some(Path::new("ref.docx")),
        );
        assert_eq!(args, vec![OsString::from("a.md"), "-o".into(), "a.pdf".into()]);
    }

    #[test]
    fn reference_doc_appended_once_for_docx_output() {
        let args = build_convert_args(
            Path::new("a.md"),
            Path::new("a.docx"),
            Some(Path::new("ref.docx")),
        );
        assert_eq!(
            args,
            vec![
                OsString::from("a.md"),
                "-o".into(),
                "a.docx".into(),
                "--reference-doc".into(),
                "ref.docx".into(),
            ]
        );
        let count = args
            .iter()
            .filter(|a| *a == &OsString::from("--reference-doc"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn docx_extension_check_is_case_insensitive() {
        assert!(is_docx_output(Path::new("A.DOCX")));
        assert!(is_docx_output(Path::new("a.Docx")));
        assert!(!is_docx_output(Path::new("a.doc")));
        assert!(!is_docx_output(Path::new("a")));
    }

    #[tokio::test]
    async fn unconfigured_path_fails_without_spawning() {
        let runner = MockRunner::exiting(true, 0, "");
        let converter = converter_with(None, runner.clone());

        let outcome = converter
            .convert_file(Path::new("a.md"), Path::new("a.docx"), None)
            .await;

        assert!(!outcome.is_success());
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_executable_fails_without_spawning() {
        let runner = MockRunner::exiting(true, 0, "");
        let converter = converter_with(
            Some(PathBuf::from("/does/not/exist/pandoc")),
            runner.clone(),
        );

        let outcome = converter
            .convert_file(Path::new("a.md"), Path::new("a.docx"), None)
            .await;

        assert!(!outcome.is_success());
        assert!(outcome.text().contains("does not exist"));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_input_fails_without_spawning() {
        let (_dir, exe, _input) = sandbox();
        let runner = MockRunner::exiting(true, 0, "");
        let converter = converter_with(Some(exe), runner.clone());

        let outcome = converter
            .convert_file(Path::new("/no/such/input.md"), Path::new("a.docx"), None)
            .await;

        assert!(!outcome.is_success());
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn successful_conversion_reports_output_name() {
        let (dir, exe, input) = sandbox();
        let runner = MockRunner::exiting(true, 0, "");
        let converter = converter_with(Some(exe.clone()), runner.clone());

        let output = dir.path().join("a.docx");
        let template = dir.path().join("ref.docx");
        let outcome = converter
            .convert_file(&input, &output, Some(&template))
            .await;

        assert!(outcome.is_success());
        assert!(outcome.text().contains("a.docx"));

        let (program, args) = runner.last_call();
        assert_eq!(program, exe);
        assert_eq!(
            args,
            vec![
                input.as_os_str().to_owned(),
                "-o".into(),
                output.as_os_str().to_owned(),
                "--reference-doc".into(),
                template.as_os_str().to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn nonzero_exit_surfaces_stderr_verbatim() {
        let (dir, exe, input) = sandbox();
        let runner = MockRunner::exiting(false, 1, "bad format");
        let converter = converter_with(Some(exe), runner);

        let outcome = converter
            .convert_file(&input, &dir.path().join("a.docx"), None)
            .await;

        assert_eq!(
            outcome,
            ConversionOutcome::Failure {
                diagnostic: "bad format".to_string()
            }
        );
    }

    #[tokio::test]
    async fn nonzero_exit_with_empty_stderr_gets_generic_diagnostic() {
        let (dir, exe, input) = sandbox();
        let runner = MockRunner::exiting(false, 64, "");
        let converter = converter_with(Some(exe), runner);

        let outcome = converter
            .convert_file(&input, &dir.path().join("a.docx"), None)
            .await;

        assert!(!outcome.is_success());
        assert!(outcome.text().contains("64"));
    }

    #[test]
    fn bare_fragment_is_wrapped() {
        let wrapped = ensure_standalone_html("<p>hello</p>");
        assert!(wrapped.starts_with("<!DOCTYPE html>"));
        assert!(wrapped.contains("<p>hello</p>"));
        assert!(wrapped.trim_end().ends_with("</html>"));
    }

    #[test]
    fn full_documents_are_not_rewrapped() {
        let doc = "<!DOCTYPE html>\n<html><body><p>x</p></body></html>";
        assert_eq!(ensure_standalone_html(doc), Cow::Borrowed(doc));

        let shouty = "  \n<HTML><body></body></HTML>";
        assert_eq!(ensure_standalone_html(shouty), Cow::Borrowed(shouty));

        let doctype = "\t<!doctype html><html></html>";
        assert_eq!(ensure_standalone_html(doctype), Cow::Borrowed(doctype));
    }

    #[tokio::test]
    async fn html_conversion_appends_preset_flags_and_cleans_up() {
        let (dir, exe, _input) = sandbox();
        let runner = MockRunner::exiting(true, 0, "");
        let converter = converter_with(Some(exe), runner.clone());

        let output = dir.path().join("out.docx");
        let outcome = converter
            .convert_html_to_docx("<p>hi</p>", &output, StylePreset::Academic)
            .await;

        assert!(outcome.is_success());
        let (_, args) = runner.last_call();
        let transient = PathBuf::from(&args[0]);
        assert_eq!(transient.extension().unwrap(), "html");
        assert!(args.contains(&OsString::from("--standalone")));
        assert!(args.contains(&OsString::from("--toc")));
        assert!(args.contains(&OsString::from("--number-sections")));
        // The transient file is gone once the call returns.
        assert!(!transient.exists());
    }

    #[tokio::test]
    async fn version_reports_first_line() {
        let (_dir, exe, _input) = sandbox();
        let runner = Arc::new(MockRunner {
            calls: Mutex::new(Vec::new()),
            response: ProcessOutput {
                success: true,
                code: Some(0),
                stdout: "pandoc 3.1.11\nFeatures: +server +lua".to_string(),
                stderr: String::new(),
            },
        });
        let converter = converter_with(Some(exe), runner);
        assert_eq!(converter.version().await.as_deref(), Some("pandoc 3.1.11"));
        assert!(converter.is_available().await);
    }

    #[test]
    fn preset_flag_table() {
        let flags = |p: StylePreset| p.pandoc_args();
        assert_eq!(flags(StylePreset::Simple), vec![OsString::from("--standalone")]);
        assert_eq!(flags(StylePreset::Business), vec![OsString::from("--standalone")]);
        assert_eq!(
            flags(StylePreset::Academic),
            vec![
                OsString::from("--standalone"),
                "--toc".into(),
                "--number-sections".into()
            ]
        );
        assert_eq!(
            flags(StylePreset::Technical),
            vec![
                OsString::from("--standalone"),
                "--highlight-style".into(),
                "pygments".into()
            ]
        );
    }

    #[test]
    fn unknown_preset_name_falls_back_to_simple() {
        assert_eq!(StylePreset::from_name("fancy"), StylePreset::Simple);
        assert_eq!(StylePreset::from_name("ACADEMIC"), StylePreset::Academic);
    }

    #[test]
    fn extension_support() {
        assert!(supports_extension("md"));
        assert!(supports_extension("DOCX"));
        assert!(!supports_extension("xyz"));
        assert_eq!(OutputFormat::Latex.extension(), "tex");
        assert_eq!(OutputFormat::Docx.extension(), "docx");
    }
}
