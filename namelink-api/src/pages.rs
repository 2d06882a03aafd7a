//! Minimal HTML for the browser form.

/// What the result section of the page shows after a submission.
pub enum Feedback {
    /// A name was resolved.
    Resolved {
        /// Canonical number
        mobile: String,
        /// The linked name
        name: String,
    },
    /// The provider has no name on file.
    NoMatch {
        /// Message shown to the user
        message: String,
    },
    /// The lookup failed; message is already sanitized.
    Problem {
        /// Message shown to the user
        message: String,
    },
}

/// Renders the lookup page, optionally with a result section.
pub fn render(feedback: Option<&Feedback>) -> String {
    let notice = match feedback {
        Some(Feedback::Resolved { mobile, name }) => format!(
            r#"<p class="result ok"><strong>{}</strong> is registered to <strong>{}</strong></p>"#,
            escape(mobile),
            escape(name)
        ),
        Some(Feedback::NoMatch { message }) => {
            format!(r#"<p class="result warn">{}</p>"#, escape(message))
        }
        Some(Feedback::Problem { message }) => {
            format!(r#"<p class="result error">{}</p>"#, escape(message))
        }
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>NameLink</title>
<style>
body {{ font-family: sans-serif; max-width: 28rem; margin: 4rem auto; padding: 0 1rem; }}
input, button {{ font-size: 1rem; padding: 0.5rem; }}
.result.ok {{ color: #166534; }}
.result.warn {{ color: #854d0e; }}
.result.error {{ color: #991b1b; }}
</style>
</head>
<body>
<h1>NameLink</h1>
<p>Find the name registered to a mobile number.</p>
<form method="post" action="/lookup">
<input type="tel" name="mobile" placeholder="Mobile number" required autofocus>
<button type="submit">Look up</button>
</form>
{notice}
</body>
</html>
"#
    )
}

fn escape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".into(),
            '<' => "&lt;".into(),
            '>' => "&gt;".into(),
            '"' => "&quot;".into(),
            '\'' => "&#39;".into(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_page_has_the_form() {
        let page = render(None);
        assert!(page.contains(r#"<form method="post" action="/lookup">"#));
        assert!(page.contains(r#"name="mobile""#));
        // No notice markup until a submission produces one
        assert!(!page.contains(r#"class="result"#));
    }

    #[test]
    fn test_resolved_page_shows_both_fields() {
        let page = render(Some(&Feedback::Resolved {
            mobile: "8318090007".into(),
            name: "JOHN DOE".into(),
        }));
        assert!(page.contains("8318090007"));
        assert!(page.contains("JOHN DOE"));
    }

    #[test]
    fn test_provider_text_is_escaped() {
        let page = render(Some(&Feedback::NoMatch {
            message: "<script>alert(1)</script>".into(),
        }));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
