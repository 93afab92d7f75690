//! Server-rendered pages.
//!
//! [`FormPage`] and [`ResultPage`] are the concrete view adapters; their
//! markup carries the class names the report reader relies on.

use crate::controller::{ProgressStep, STEP_INTERVAL};
use crate::models::AnalysisResult;
use crate::notice::Notice;
use crate::report::ReportFile;
use crate::validation::{CharCount, MAX_MESSAGE_CHARS, MIN_MESSAGE_CHARS};
use crate::view::{DownloadSink, MessageInput, ResultView};

const STYLESHEET: &str = "/css/style.css";

const OVERLAY_ID: &str = "progressOverlay";

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - SafeGuard</title>
<link rel="stylesheet" href="{css}">
<style>
@keyframes fadeIn {{ from {{ opacity: 0; transform: translateY(-8px); }} }}
@keyframes fadeOut {{ to {{ opacity: 0; visibility: hidden; }} }}
.download-toast {{ display: none; }}
</style>
</head>
<body>
<nav class="navbar"><a href="/home">SafeGuard</a></nav>
<main class="container">
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        css = STYLESHEET,
        body = body
    )
}

/// CSS `animation` value for a notice: enter, hold, then exit.
fn notice_animation(notice: &Notice) -> String {
    format!(
        "fadeIn {exit}ms ease, fadeOut {exit}ms ease {delay}ms forwards",
        exit = notice.exit_transition.as_millis(),
        delay = notice.dismiss_after.as_millis(),
    )
}

/// Render `notice`; `inline_animation` starts its clock at page load.
fn render_notice(notice: &Notice, extra_class: &str, inline_animation: bool) -> String {
    let style = if inline_animation {
        format!(r#" style="animation: {}""#, notice_animation(notice))
    } else {
        String::new()
    };
    format!(
        r#"<div class="notice {kind} {extra}" role="alert"{style}><i class="fas fa-{icon}"></i> <span>{text}</span></div>"#,
        kind = notice.kind.css_class(),
        extra = extra_class,
        style = style,
        icon = notice.kind.icon(),
        text = escape_html(&notice.text),
    )
}

/// The analysis form.
#[derive(Debug, Clone)]
pub struct FormPage {
    message: String,
    focused: bool,
    notice: Option<Notice>,
    char_count: CharCount,
    progress: Option<u8>,
    steps: Vec<ProgressStep>,
}

impl Default for FormPage {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl FormPage {
    /// A bare form holding `message`; counters start empty until the
    /// controller opens it.
    pub fn new(message: String) -> Self {
        Self {
            message,
            focused: false,
            notice: None,
            char_count: CharCount::of(""),
            progress: None,
            steps: Vec::new(),
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::from(r#"<section class="analyzer"><h1>Analyze a Message</h1>"#);

        let onsubmit = if self.steps.is_empty() {
            String::new()
        } else {
            format!(
                r#" onsubmit="document.getElementById('{}').hidden = false""#,
                OVERLAY_ID
            )
        };
        body.push_str(&format!(
            r#"<form id="analyzeForm" method="post" action="/analyze"{}>"#,
            onsubmit
        ));
        body.push_str(r#"<div class="form-group">"#);
        body.push_str(&format!(
            r#"<textarea id="message" name="message" rows="8" required minlength="{min}" maxlength="{max}" placeholder="Paste the message you want to check"{autofocus}>{value}</textarea>"#,
            min = MIN_MESSAGE_CHARS,
            max = MAX_MESSAGE_CHARS,
            autofocus = if self.focused { " autofocus" } else { "" },
            value = escape_html(&self.message),
        ));
        body.push_str(&format!(
            r#"<div class="char-counter"><span id="charCount" class="{tone}">{count}</span> / {max}</div>"#,
            tone = self.char_count.tone.css_class(),
            count = self.char_count.count,
            max = MAX_MESSAGE_CHARS,
        ));
        if let Some(percent) = self.progress {
            body.push_str(&format!(
                r#"<div class="form-progress"><div class="progress-bar-container"><div class="progress-bar" style="width: {}%"></div></div></div>"#,
                percent
            ));
        }
        if let Some(notice) = &self.notice {
            body.push_str(&format!(
                r#"<div class="error-message">{}</div>"#,
                render_notice(notice, "", true)
            ));
        }
        body.push_str("</div>");

        body.push_str(r#"<div class="form-actions">"#);
        body.push_str(r#"<button type="submit" class="btn-analyze">Analyze Message</button>"#);
        body.push_str("</div></form>");
        body.push_str(r#"<form class="clear-form" method="post" action="/clear"><button type="submit" class="btn-clear">Clear</button></form>"#);

        body.push_str(r#"<div class="examples"><span>Try an example:</span>"#);
        for kind in crate::samples::ExampleKind::ALL {
            body.push_str(&format!(
                r#"<a class="btn-example {k}" href="/home?pick={k}">{k}</a>"#,
                k = kind.as_str()
            ));
        }
        body.push_str("</div>");

        if !self.steps.is_empty() {
            body.push_str(&render_overlay(&self.steps));
        }

        body.push_str("</section>");
        layout("Analyze", &body)
    }
}

/// Hidden until the form submits; step animations start once shown.
fn render_overlay(steps: &[ProgressStep]) -> String {
    let interval = STEP_INTERVAL.as_millis();
    let items: String = steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            format!(
                r#"<div class="step" data-step="{n}" style="animation-delay: {delay}ms"><i class="fas fa-{icon}"></i><span>{title}</span></div>"#,
                n = index + 1,
                delay = interval * index as u128,
                icon = step.icon,
                title = escape_html(step.title),
            )
        })
        .collect();

    format!(
        r#"<div id="{id}" class="progress-overlay" hidden><div class="progress-content"><div class="progress-spinner"><div class="spinner"></div></div><h3>Analyzing Your Message</h3><div class="progress-steps">{items}</div></div></div>"#,
        id = OVERLAY_ID,
        items = items,
    )
}

impl MessageInput for FormPage {
    fn message(&self) -> String {
        self.message.clone()
    }

    fn set_message(&mut self, value: String) {
        self.message = value;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn set_char_count(&mut self, count: CharCount) {
        self.char_count = count;
    }

    fn set_form_progress(&mut self, percent: Option<u8>) {
        self.progress = percent;
    }

    fn attach_progress(&mut self, steps: &[ProgressStep]) {
        self.steps = steps.to_vec();
    }
}

/// A rendered analysis result.
#[derive(Debug, Clone)]
pub struct ResultPage {
    result: AnalysisResult,
}

impl ResultPage {
    pub fn new(result: AnalysisResult) -> Self {
        Self { result }
    }

    pub fn render(&self, download: &DownloadSlot) -> String {
        let r = &self.result;
        let confidence = r.confidence_percent();

        let mut body = format!(
            r#"<section class="results-grid"><div class="result-card verdict-card {class}"><div class="verdict-icon"></div><h2 class="verdict-title">{verdict}</h2></div>"#,
            class = r.verdict.css_class(),
            verdict = escape_html(r.verdict.as_str()),
        );
        body.push_str(&format!(
            r#"<div class="result-card"><h3>Risk Score</h3><span class="risk-percentage">{risk}</span>%<div class="risk-bar" style="width: {risk}%"></div></div>"#,
            risk = r.risk_score,
        ));
        body.push_str(&format!(
            r#"<div class="result-card"><h3>AI Confidence</h3><span class="confidence-percentage">{c}</span>%<div class="confidence-bar" style="width: {c}%"></div></div>"#,
            c = confidence,
        ));
        body.push_str(&format!(
            r#"<div class="detail-card"><span class="detail-label">Language</span><span class="detail-value">{}</span></div>"#,
            escape_html(&r.detected_language),
        ));

        body.push_str(&format!(
            r#"<div class="message-box"><h3>Analyzed Message</h3><p>{}</p></div>"#,
            escape_html(&r.message),
        ));
        if let Some(translated) = &r.translated_text {
            body.push_str(&format!(
                r#"<div class="translation-box"><h3>Translation</h3><p>{}</p></div>"#,
                escape_html(translated),
            ));
        }

        body.push_str(r#"<div class="reasons"><h3>Why this verdict</h3>"#);
        for reason in &r.reasons {
            body.push_str(&format!(
                r#"<div class="reason-item"><i class="fas fa-angle-right"></i><span>{}</span></div>"#,
                escape_html(reason),
            ));
        }
        body.push_str("</div>");

        body.push_str(r#"<div class="result-actions">"#);
        if let Some(file) = &download.file {
            body.push_str(&format!(
                r#"<a class="btn-download" download="{name}" href="{href}">Download Report</a>"#,
                name = escape_html(&file.file_name),
                href = escape_html(&file.data_url()),
            ));
        }
        if let Some(toast) = &download.toast {
            // The toast's clock starts when the download link takes focus.
            body.push_str(&format!(
                "<style>.btn-download:focus ~ .download-toast {{ display: flex; animation: {}; }}</style>",
                notice_animation(toast)
            ));
            body.push_str(&render_notice(toast, "download-toast", false));
        }
        body.push_str(r#"<a class="btn-analyze" href="/home">Analyze Another</a></div>"#);
        body.push_str("</section>");

        layout("Analysis Result", &body)
    }
}

impl ResultView for ResultPage {
    fn verdict_title(&self) -> Option<String> {
        Some(self.result.verdict.as_str().to_string())
    }

    fn risk_percentage(&self) -> Option<String> {
        Some(self.result.risk_score.to_string())
    }

    fn confidence_percentage(&self) -> Option<String> {
        Some(self.result.confidence_percent())
    }

    fn detail_value(&self) -> Option<String> {
        Some(self.result.detected_language.clone())
    }

    fn message_text(&self) -> Option<String> {
        Some(self.result.message.clone())
    }

    fn reason_items(&self) -> Vec<String> {
        self.result.reasons.clone()
    }
}

/// Download link and toast attached to a result page.
#[derive(Debug, Clone, Default)]
pub struct DownloadSlot {
    pub file: Option<ReportFile>,
    pub toast: Option<Notice>,
}

impl DownloadSink for DownloadSlot {
    fn offer_download(&mut self, file: ReportFile) {
        self.file = Some(file);
    }

    fn show_toast(&mut self, notice: Notice) {
        self.toast = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{download_report, FormController, PROGRESS_STEPS};
    use crate::models::Verdict;

    fn result() -> AnalysisResult {
        AnalysisResult {
            verdict: Verdict::Scam,
            risk_score: 92,
            confidence: 0.875,
            reasons: vec![
                "Suspicious keywords detected: urgent".to_string(),
                "<b>escaped</b>".to_string(),
            ],
            detected_language: "en".to_string(),
            message: "URGENT & important".to_string(),
            translated_text: None,
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn rejected_form_renders_notice_and_autofocus() {
        let controller = FormController::new();
        let mut page = FormPage::new("hey".to_string());
        controller.open(&mut page);
        controller.submit(&mut page);
        let html = page.render();

        assert!(html.contains("Message must be at least 5 characters long"));
        assert!(html.contains(" autofocus"));
        assert!(html.contains(
            "animation: fadeIn 300ms ease, fadeOut 300ms ease 5000ms forwards"
        ));
        assert!(html.contains(r#"<span id="charCount" class="count-muted">3</span>"#));
    }

    #[test]
    fn bare_form_has_no_notice_or_overlay() {
        let html = FormPage::default().render();
        assert!(!html.contains("error-message"));
        assert!(!html.contains("progress-overlay"));
        assert!(!html.contains("onsubmit"));
        assert!(html.contains(r#"href="/home?pick=scam""#));
        assert!(html.contains(r#"action="/clear""#));
    }

    #[test]
    fn opened_form_carries_hidden_overlay_revealed_on_submit() {
        let mut page = FormPage::default();
        FormController::new().open(&mut page);
        let html = page.render();

        assert!(html.contains(r#"<div id="progressOverlay" class="progress-overlay" hidden>"#));
        assert!(html.contains(
            r#"onsubmit="document.getElementById('progressOverlay').hidden = false""#
        ));
        assert!(html.contains(r#"data-step="4" style="animation-delay: 2400ms""#));
        for step in PROGRESS_STEPS {
            assert!(html.contains(step.title));
        }
    }

    #[test]
    fn form_escapes_message_value() {
        let page = FormPage::new("</textarea><script>".to_string());
        assert!(page.render().contains("&lt;/textarea&gt;&lt;script&gt;"));
    }

    #[test]
    fn result_page_uses_read_contract_classes() {
        let page = ResultPage::new(result());
        let html = page.render(&DownloadSlot::default());

        assert!(html.contains(r#"<h2 class="verdict-title">Scam</h2>"#));
        assert!(html.contains(r#"<span class="risk-percentage">92</span>"#));
        assert!(html.contains(r#"<span class="confidence-percentage">87.5</span>"#));
        assert!(html.contains(r#"<span class="detail-value">en</span>"#));
        assert!(html.contains("<p>URGENT &amp; important</p>"));
        assert!(html.contains("<span>&lt;b&gt;escaped&lt;/b&gt;</span>"));
        assert!(!html.contains("btn-download"));
    }

    #[test]
    fn result_page_reads_back_its_own_fields() {
        let page = ResultPage::new(result());
        assert_eq!(page.verdict_title().as_deref(), Some("Scam"));
        assert_eq!(page.confidence_percentage().as_deref(), Some("87.5"));
        assert_eq!(page.message_text().as_deref(), Some("URGENT & important"));
        assert_eq!(page.reason_items().len(), 2);
    }

    #[test]
    fn result_page_embeds_report_download() {
        let page = ResultPage::new(result());
        let mut slot = DownloadSlot::default();
        download_report(&page, &mut slot, chrono::Utc::now());
        let html = page.render(&slot);

        assert!(html.contains(r#"download="scam-analysis-report-"#));
        assert!(html.contains(r#"href="data:text/plain;charset=utf-8,"#));
        assert!(html.contains("Report downloaded successfully!"));
        assert!(html.contains("download-toast"));
    }

    #[test]
    fn download_toast_animates_from_link_focus() {
        let page = ResultPage::new(result());
        let mut slot = DownloadSlot::default();
        download_report(&page, &mut slot, chrono::Utc::now());
        let html = page.render(&slot);

        assert!(html.contains(
            ".btn-download:focus ~ .download-toast { display: flex; animation: fadeIn 300ms ease, fadeOut 300ms ease 3000ms forwards; }"
        ));
        assert!(html.contains(r#"<div class="notice notice-success download-toast" role="alert"><i"#));
        assert!(!html.contains(r#"download-toast" role="alert" style="#));
    }
}
