//! Per-document shortcode resolution and rewriting.

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::shortcode::{find_shortcodes, render_code_block, Shortcode};

use super::context::Context;

/// What happened to a single shortcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcodeOutcome {
    /// The raw body was fetched and inlined.
    Inlined { url: String },
    /// Dry run: the raw body would be fetched from `url`.
    Planned { url: String },
    /// No link could be extracted; the token was left untouched.
    MissingLink,
    /// The fetch returned a status other than 200; the token was left untouched.
    BadStatus { url: String, status: u16 },
    /// The request itself failed; the token was left untouched.
    FetchFailed { url: String, message: String },
}

impl ShortcodeOutcome {
    /// Returns true if the shortcode was replaced.
    pub fn is_inlined(&self) -> bool {
        matches!(self, ShortcodeOutcome::Inlined { .. })
    }

    /// Returns true if the shortcode could not be resolved.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ShortcodeOutcome::MissingLink
                | ShortcodeOutcome::BadStatus { .. }
                | ShortcodeOutcome::FetchFailed { .. }
        )
    }

    /// Returns the raw URL involved, if a link was found.
    pub fn url(&self) -> Option<&str> {
        match self {
            ShortcodeOutcome::Inlined { url }
            | ShortcodeOutcome::Planned { url }
            | ShortcodeOutcome::BadStatus { url, .. }
            | ShortcodeOutcome::FetchFailed { url, .. } => Some(url),
            ShortcodeOutcome::MissingLink => None,
        }
    }

    /// Returns a short description for display.
    pub fn describe(&self) -> String {
        match self {
            ShortcodeOutcome::Inlined { url } => format!("inlined {}", url),
            ShortcodeOutcome::Planned { url } => format!("would fetch {}", url),
            ShortcodeOutcome::MissingLink => "no link found".to_string(),
            ShortcodeOutcome::BadStatus { url, status } => format!("{} returned {}", url, status),
            ShortcodeOutcome::FetchFailed { url, message } => {
                format!("{} failed: {}", url, message)
            }
        }
    }
}

/// A shortcode together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeReport {
    pub shortcode: Shortcode,
    pub outcome: ShortcodeOutcome,
}

/// Result of processing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Path of the document, as discovered.
    pub path: PathBuf,
    /// Shortcodes in discovery order.
    pub shortcodes: Vec<ShortcodeReport>,
    /// Number of times the document was written.
    pub writes: usize,
}

impl FileReport {
    /// Creates an empty report for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            shortcodes: Vec::new(),
            writes: 0,
        }
    }

    /// Number of shortcodes found.
    pub fn found(&self) -> usize {
        self.shortcodes.len()
    }

    /// Number of shortcodes inlined.
    pub fn inlined(&self) -> usize {
        self.shortcodes
            .iter()
            .filter(|s| s.outcome.is_inlined())
            .count()
    }

    /// Number of shortcodes that could not be resolved.
    pub fn failed(&self) -> usize {
        self.shortcodes
            .iter()
            .filter(|s| s.outcome.is_failure())
            .count()
    }
}

/// Resolves one shortcode, returning its outcome and the body to inline.
async fn resolve(
    ctx: &Context,
    path: &Path,
    shortcode: &Shortcode,
) -> (ShortcodeOutcome, Option<String>) {
    let Some(link) = shortcode.link() else {
        tracing::warn!(
            "{}:{}: no link found in {}",
            path.display(),
            shortcode.line,
            shortcode.text
        );
        return (ShortcodeOutcome::MissingLink, None);
    };

    let url = link.raw_url(&ctx.config.raw_suffix);
    match ctx.source.fetch(&url).await {
        Ok(fetched) if fetched.is_ok() => (ShortcodeOutcome::Inlined { url }, Some(fetched.body)),
        Ok(fetched) => {
            tracing::warn!(
                "{}:{}: {} returned status {}",
                path.display(),
                shortcode.line,
                url,
                fetched.status
            );
            let status = fetched.status;
            (ShortcodeOutcome::BadStatus { url, status }, None)
        }
        Err(e) => {
            tracing::warn!("{}:{}: fetching {} failed: {}", path.display(), shortcode.line, url, e);
            let message = e.to_string();
            (ShortcodeOutcome::FetchFailed { url, message }, None)
        }
    }
}

/// Replaces every gist shortcode in a document with its fetched body.
///
/// Shortcodes are handled one at a time in document order. Only a 200
/// response replaces its shortcode; any other outcome leaves the token in
/// place. The document is written only if at least one shortcode was
/// inlined, once at the end or after every substitution depending on
/// `config.write_policy`.
pub async fn process_file(ctx: &Context, path: &Path) -> Result<FileReport> {
    let original = ctx.store.read(path)?;
    let shortcodes = find_shortcodes(&original);
    let mut report = FileReport::new(path);

    if shortcodes.is_empty() {
        return Ok(report);
    }

    let writes_each = ctx.config.write_policy.writes_each();
    let mut converted = String::with_capacity(original.len());
    let mut cursor = 0;

    for shortcode in shortcodes {
        let (outcome, body) = resolve(ctx, path, &shortcode).await;

        if let Some(body) = body {
            converted.push_str(&original[cursor..shortcode.start]);
            converted.push_str(&render_code_block(&ctx.config.language, &body));
            cursor = shortcode.end;

            if writes_each {
                let snapshot = format!("{}{}", converted, &original[cursor..]);
                ctx.store.write(path, &snapshot)?;
                report.writes += 1;
            }
        }

        report.shortcodes.push(ShortcodeReport { shortcode, outcome });
    }

    if !writes_each && report.inlined() > 0 {
        converted.push_str(&original[cursor..]);
        ctx.store.write(path, &converted)?;
        report.writes += 1;
    }

    tracing::info!(
        "{} github gist links converted to markdown ({}/{})",
        path.display(),
        report.inlined(),
        report.found()
    );

    Ok(report)
}

/// Lists the shortcodes of a document and the URLs they would be fetched from.
///
/// Nothing is fetched and nothing is written.
pub fn scan_file(ctx: &Context, path: &Path) -> Result<FileReport> {
    let content = ctx.store.read(path)?;
    let mut report = FileReport::new(path);

    for shortcode in find_shortcodes(&content) {
        let outcome = match shortcode.link() {
            Some(link) => ShortcodeOutcome::Planned {
                url: link.raw_url(&ctx.config.raw_suffix),
            },
            None => ShortcodeOutcome::MissingLink,
        };
        report.shortcodes.push(ShortcodeReport { shortcode, outcome });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WritePolicy;
    use crate::test_utils::{memory_context, GIST_A, GIST_B, RAW_A, RAW_B};
    use pretty_assertions::assert_eq;

    const POST: &str = "pages/post.md";

    #[tokio::test]
    async fn test_no_shortcodes_untouched() {
        let text = "# Hello\n\nNo gists here. {% youtube abc %}\n";
        let (ctx, store, source) = memory_context(&[(POST, text)], &[]);

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(report.found(), 0);
        assert_eq!(report.writes, 0);
        assert_eq!(store.content(Path::new(POST)).unwrap(), text);
        assert_eq!(store.write_count(Path::new(POST)), 0);
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_single_shortcode_inlined() {
        let text = format!("# Post\n\n{{% gist {} %}}\n\nThe end.\n", GIST_A);
        let (ctx, store, source) =
            memory_context(&[(POST, text.as_str())], &[(RAW_A, 200, "console.log(1)")]);

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            "# Post\n\n```js\nconsole.log(1)\n```\n\nThe end.\n"
        );
        assert_eq!(report.inlined(), 1);
        assert_eq!(report.writes, 1);
        assert_eq!(source.requests(), vec![RAW_A]);
    }

    #[tokio::test]
    async fn test_two_shortcodes_written_once() {
        let text = format!("{{% gist {} %}}\ntext\n{{% gist {} %}}\n", GIST_A, GIST_B);
        let (ctx, store, source) = memory_context(
            &[(POST, text.as_str())],
            &[(RAW_A, 200, "first()"), (RAW_B, 200, "second()")],
        );

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            "```js\nfirst()\n```\ntext\n```js\nsecond()\n```\n"
        );
        assert_eq!(report.writes, 1);
        assert_eq!(store.write_count(Path::new(POST)), 1);
        assert_eq!(source.requests(), vec![RAW_A, RAW_B]);
    }

    #[tokio::test]
    async fn test_two_shortcodes_written_per_shortcode() {
        let text = format!("{{% gist {} %}}\ntext\n{{% gist {} %}}\n", GIST_A, GIST_B);
        let (mut ctx, store, _) = memory_context(
            &[(POST, text.as_str())],
            &[(RAW_A, 200, "first()"), (RAW_B, 200, "second()")],
        );
        ctx.config.write_policy = WritePolicy::PerShortcode;

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(report.writes, 2);
        assert_eq!(store.write_count(Path::new(POST)), 2);
        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            "```js\nfirst()\n```\ntext\n```js\nsecond()\n```\n"
        );
    }

    #[tokio::test]
    async fn test_not_found_not_written() {
        let text = format!("{{% gist {} %}}\n", GIST_A);
        let (ctx, store, _) =
            memory_context(&[(POST, text.as_str())], &[(RAW_A, 404, "Not Found")]);

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(
            report.shortcodes[0].outcome,
            ShortcodeOutcome::BadStatus {
                url: RAW_A.to_string(),
                status: 404
            }
        );
        assert_eq!(report.writes, 0);
        assert_eq!(store.write_count(Path::new(POST)), 0);
        assert_eq!(store.content(Path::new(POST)).unwrap(), text);
    }

    #[tokio::test]
    async fn test_failed_shortcode_kept_when_later_succeeds() {
        let text = format!("{{% gist {} %}}\n{{% gist {} %}}\n", GIST_A, GIST_B);
        let (mut ctx, store, _) = memory_context(
            &[(POST, text.as_str())],
            &[(RAW_A, 404, "Not Found"), (RAW_B, 200, "ok()")],
        );
        ctx.config.write_policy = WritePolicy::PerShortcode;

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            format!("{{% gist {} %}}\n```js\nok()\n```\n", GIST_A)
        );
        assert_eq!(report.inlined(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.writes, 1);
    }

    #[tokio::test]
    async fn test_failed_shortcode_kept_when_later_succeeds_written_once() {
        let text = format!("{{% gist {} %}}\n{{% gist {} %}}\n", GIST_A, GIST_B);
        let (ctx, store, _) = memory_context(
            &[(POST, text.as_str())],
            &[(RAW_A, 404, "Not Found"), (RAW_B, 200, "ok()")],
        );

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            format!("{{% gist {} %}}\n```js\nok()\n```\n", GIST_A)
        );
        assert_eq!(report.inlined(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.writes, 1);
        assert_eq!(store.write_count(Path::new(POST)), 1);
    }

    #[tokio::test]
    async fn test_per_shortcode_first_write_holds_only_first_substitution() {
        let text = format!("{{% gist {} %}}\ntext\n{{% gist {} %}}\n", GIST_A, GIST_B);
        let (mut ctx, store, _) = memory_context(
            &[(POST, text.as_str())],
            &[(RAW_A, 200, "first()"), (RAW_B, 404, "Not Found")],
        );
        ctx.config.write_policy = WritePolicy::PerShortcode;

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(report.writes, 1);
        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            format!("```js\nfirst()\n```\ntext\n{{% gist {} %}}\n", GIST_B)
        );
    }

    #[tokio::test]
    async fn test_fetch_error_continues_with_next_shortcode() {
        let text = format!("{{% gist {} %}}\n{{% gist {} %}}\n", GIST_A, GIST_B);
        let (ctx, store, source) = memory_context(&[(POST, text.as_str())], &[(RAW_B, 200, "b()")]);

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert!(matches!(
            report.shortcodes[0].outcome,
            ShortcodeOutcome::FetchFailed { .. }
        ));
        assert!(report.shortcodes[1].outcome.is_inlined());
        assert_eq!(source.requests(), vec![RAW_A, RAW_B]);
        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            format!("{{% gist {} %}}\n```js\nb()\n```\n", GIST_A)
        );
    }

    #[tokio::test]
    async fn test_missing_link_reported() {
        let text = "{% gist octocat/abc123 %}\n";
        let (ctx, store, source) = memory_context(&[(POST, text)], &[]);

        let report = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(report.shortcodes[0].outcome, ShortcodeOutcome::MissingLink);
        assert_eq!(report.shortcodes[0].shortcode.line, 1);
        assert_eq!(report.writes, 0);
        assert_eq!(store.content(Path::new(POST)).unwrap(), text);
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_configured_language() {
        let text = format!("{{% gist {} %}}", GIST_A);
        let (mut ctx, store, _) =
            memory_context(&[(POST, text.as_str())], &[(RAW_A, 200, "fn main() {}")]);
        ctx.config.language = "rust".to_string();

        process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            "```rust\nfn main() {}\n```"
        );
    }

    #[tokio::test]
    async fn test_body_containing_shortcode_not_reprocessed() {
        let text = format!("{{% gist {} %}}\n{{% gist {} %}}\n", GIST_A, GIST_B);
        let nested = format!("// {{% gist {} %}}", GIST_B);
        let (ctx, store, _) = memory_context(
            &[(POST, text.as_str())],
            &[(RAW_A, 200, nested.as_str()), (RAW_B, 200, "b()")],
        );

        process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(
            store.content(Path::new(POST)).unwrap(),
            format!("```js\n{}\n```\n```js\nb()\n```\n", nested)
        );
    }

    #[tokio::test]
    async fn test_idempotent_on_converted_file() {
        let text = format!("{{% gist {} %}}\n", GIST_A);
        let (ctx, store, source) = memory_context(&[(POST, text.as_str())], &[(RAW_A, 200, "x()")]);

        process_file(&ctx, Path::new(POST)).await.unwrap();
        let converted = store.content(Path::new(POST)).unwrap();

        let second = process_file(&ctx, Path::new(POST)).await.unwrap();
        let third = process_file(&ctx, Path::new(POST)).await.unwrap();

        assert_eq!(second.found(), 0);
        assert_eq!(third.found(), 0);
        assert_eq!(store.content(Path::new(POST)).unwrap(), converted);
        assert_eq!(store.write_count(Path::new(POST)), 1);
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let (ctx, _, _) = memory_context(&[], &[]);
        assert!(process_file(&ctx, Path::new("nope.md")).await.is_err());
    }

    #[test]
    fn test_scan_file() {
        let text = format!("{{% gist {} %}}\n{{% gist nothing %}}\n", GIST_A);
        let (ctx, store, source) = memory_context(&[(POST, text.as_str())], &[]);

        let report = scan_file(&ctx, Path::new(POST)).unwrap();

        assert_eq!(
            report.shortcodes[0].outcome,
            ShortcodeOutcome::Planned {
                url: RAW_A.to_string()
            }
        );
        assert_eq!(report.shortcodes[1].outcome, ShortcodeOutcome::MissingLink);
        assert_eq!(report.shortcodes[1].shortcode.line, 2);
        assert_eq!(store.write_count(Path::new(POST)), 0);
        assert!(source.requests().is_empty());
    }

    #[test]
    fn test_outcome_describe() {
        let outcome = ShortcodeOutcome::BadStatus {
            url: "https://a.com/raw".to_string(),
            status: 500,
        };
        assert_eq!(outcome.describe(), "https://a.com/raw returned 500");
        assert_eq!(outcome.url(), Some("https://a.com/raw"));
        assert!(outcome.is_failure());
        assert_eq!(ShortcodeOutcome::MissingLink.url(), None);
    }
}
