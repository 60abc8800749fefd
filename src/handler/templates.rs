//! Response body rendering
//!
//! Pure functions from (variant, instant) to body text; no I/O.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use super::policy::PolicyVariant;
use crate::config::DemoConfig;
use crate::http::minute_second;

/// Render a stylesheet that writes `MM:SS` of `at` into the element `id`
pub fn render_css(id: &str, at: DateTime<Utc>) -> String {
    format!("\n#{id}::before {{\n\tcontent: '{}';\n}}\n", minute_second(at))
}

/// Unix timestamp of `now` rounded to the nearest minute, halves rounding up
pub fn rounded_minute(now: DateTime<Utc>) -> i64 {
    (now.timestamp_millis() + 30_000).div_euclid(60_000) * 60
}

/// Stylesheet href for a variant; the versioned one embeds `version`
pub fn stylesheet_href(variant: PolicyVariant, version: i64) -> String {
    match variant {
        PolicyVariant::MaxAgeImmutableVersioned => {
            format!("{}-{version}.css", PolicyVariant::VERSIONED_PREFIX)
        }
        other => format!("/{}.css", other.name()),
    }
}

/// Render the home page
///
/// Links every stylesheet and lays out one stamp row per variant. The
/// versioned stylesheet URL changes once per minute.
pub fn render_home(now: DateTime<Utc>, demo: &DemoConfig) -> String {
    let version = rounded_minute(now);

    let mut links = String::new();
    let mut stamps = String::new();
    for variant in PolicyVariant::STYLESHEETS {
        let _ = writeln!(
            links,
            "\t<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">",
            stylesheet_href(variant, version)
        );
        let _ = writeln!(
            stamps,
            "\t<div id=\"{}\">&nbsp;&nbsp;{}</div>",
            variant.element_id(),
            variant.name().replace('-', " ")
        );
    }

    format!(
        r#"
<!DOCTYPE html>
<html>
<head>
	<meta charset="utf-8">
	<title>Cache lab</title>
{links}	<style>
		h1 {{ font-size: 18px; text-align: center; }}
		p {{ font-size: 16px; text-align: center; }}
		li {{ font-size: 15px; padding-bottom: 10px; }}
		.stamps {{ width: 300px; margin: 40px auto; padding: 0 0 0 40px; }}
		.stamps > * {{ padding: 3px 0; }}
		.info {{ width: 600px; margin: 40px auto; }}
	</style>
</head>
<body>
<h1>Immutable</h1>
<p>Reload the page and watch which timestamps change. Test over https in a browser that honours "immutable".</p>
<div class="stamps">
	<div id="{html_id}">{html_stamp}&nbsp;&nbsp;html</div>
{stamps}</div>

<div class="info">
	<ul>
	<li>The html has "Cache-Control: private" and its timestamp updates on every request.</li>
	<li>Every other timestamp comes from a stylesheet and only updates when the browser fetches that stylesheet again.</li>
	<li>"max-age" is {max_age} seconds and Etags change every {bucket} seconds.</li>
	<li>The versioned stylesheet is cached for a year; its URL changes every minute.</li>
	</ul>
</div>
</body>
</html>
"#,
        html_id = PolicyVariant::PlainHtml.element_id(),
        html_stamp = minute_second(now),
        max_age = demo.max_age,
        bucket = demo.etag_bucket.seconds(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_render_css() {
        let css = render_css("etag-timestamp", at(1_700_000_000));
        assert_eq!(css, "\n#etag-timestamp::before {\n\tcontent: '13:20';\n}\n");
    }

    #[test]
    fn test_rounded_minute() {
        // 22:13:20 rounds down, 22:13:30 rounds up
        assert_eq!(rounded_minute(at(1_700_000_000)), 1_699_999_980);
        assert_eq!(rounded_minute(at(1_700_000_010)), 1_700_000_040);
        assert_eq!(rounded_minute(at(1_699_999_980)), 1_699_999_980);
    }

    #[test]
    fn test_stylesheet_href() {
        assert_eq!(stylesheet_href(PolicyVariant::Etag, 0), "/etag.css");
        assert_eq!(
            stylesheet_href(PolicyVariant::MaxAgeImmutableVersioned, 1_700_000_040),
            "/max-age-and-immutable-versioned-1700000040.css"
        );
    }

    #[test]
    fn test_render_home() {
        let html = render_home(at(1_700_000_010), &DemoConfig::default());
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("href=\"/immutable.css\""));
        assert!(html.contains("href=\"/etag-and-immutable.css\""));
        assert!(html.contains("href=\"/max-age-and-immutable-versioned-1700000040.css\""));
        assert!(html.contains("<div id=\"html-timestamp\">13:30&nbsp;&nbsp;html</div>"));
        assert!(html.contains("<div id=\"max-age-timestamp\">&nbsp;&nbsp;max age</div>"));
        assert!(html.contains("\"max-age\" is 60 seconds and Etags change every 60 seconds"));
    }
}
