//! HTML rendering. Pure functions from data to markup; templates are compiled in.

use askama::Template;

use tablegate_core::{MAX_FIELD_CHARS, Record};

#[derive(Template)]
#[template(path = "records.html")]
struct RecordsPage<'a> {
    records: &'a [Record],
    user_name: Option<&'a str>,
    max_chars: usize,
}

#[derive(Template)]
#[template(path = "auth_failed.html")]
struct AuthFailedPage<'a> {
    reason: &'a str,
    message: &'a str,
}

/// The editable table: one form per record posting to `/edit/{id}`.
pub fn render_records(records: &[Record], user_name: Option<&str>) -> Result<String, askama::Error> {
    RecordsPage {
        records,
        user_name,
        max_chars: MAX_FIELD_CHARS,
    }
    .render()
}

pub fn render_auth_failed(reason: &str, message: &str) -> Result<String, askama::Error> {
    AuthFailedPage { reason, message }.render()
}

#[cfg(test)]
mod tests {
    use tablegate_core::RecordId;

    use super::*;

    #[test]
    fn renders_every_record_with_an_edit_form() {
        let records = vec![
            Record::new(RecordId::new(1), "alpha", "beta"),
            Record::new(RecordId::new(7), "gamma", ""),
        ];
        let html = render_records(&records, Some("Ada")).unwrap();

        assert!(html.contains(r#"action="/edit/1""#));
        assert!(html.contains(r#"action="/edit/7""#));
        for value in ["alpha", "beta", "gamma"] {
            assert!(html.contains(&format!(r#"value="{value}""#)), "missing {value}");
        }
        assert!(html.contains("Ada"));
        assert!(html.contains(r#"maxlength="100""#));
    }

    #[test]
    fn escapes_record_content() {
        let records = vec![Record::new(RecordId::new(1), "<script>alert(1)</script>", "\"quoted\"")];
        let html = render_records(&records, None).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains(r#"value=""quoted"""#));
    }

    #[test]
    fn empty_table_says_so() {
        let html = render_records(&[], None).unwrap();
        assert!(html.contains("No records"));
    }

    #[test]
    fn auth_failure_page_names_the_reason_and_offers_retry() {
        let html = render_auth_failed("state_mismatch", "The sign-in request could not be verified.").unwrap();
        assert!(html.contains("state_mismatch"));
        assert!(html.contains(r#"href="/login""#));
    }
}
