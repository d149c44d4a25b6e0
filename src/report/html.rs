use super::{verdict_color, NO_MISSING_REQUIREMENTS};
use crate::domain::model::Assessment;

pub fn render_html(index: usize, assessment: &Assessment) -> String {
    let color = verdict_color(&assessment.verdict);

    let strengths_html = list_items(&assessment.strengths);
    let missing_html = if assessment.missing_requirements.is_empty() {
        format!("<li><em>{}</em></li>", NO_MISSING_REQUIREMENTS)
    } else {
        list_items(&assessment.missing_requirements)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="lv">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>CV{index} Vērtējums</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            background: #f5f5f5;
        }}
        .container {{
            background: white;
            border-radius: 8px;
            padding: 30px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }}
        h1 {{
            color: #1f2937;
            border-bottom: 3px solid {color};
            padding-bottom: 10px;
        }}
        .score {{
            font-size: 48px;
            font-weight: bold;
            color: {color};
            text-align: center;
            margin: 20px 0;
        }}
        .verdict {{
            background: {color};
            color: white;
            padding: 10px 20px;
            border-radius: 5px;
            text-align: center;
            font-size: 20px;
            font-weight: bold;
            text-transform: uppercase;
            margin: 20px 0;
        }}
        .summary {{
            background: #f9fafb;
            padding: 15px;
            border-left: 4px solid {color};
            margin: 20px 0;
            line-height: 1.6;
        }}
        h2 {{
            color: #374151;
            margin-top: 30px;
        }}
        ul {{
            line-height: 1.8;
        }}
        li {{
            margin: 10px 0;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>CV{index} Vērtējuma Pārskats</h1>

        <div class="score">{score}/100</div>
        <div class="verdict" style="background: {color};">{verdict}</div>

        <div class="summary">
            <strong>Kopsavilkums:</strong><br>
            {summary}
        </div>

        <h2>✨ Stiprās Puses</h2>
        <ul>
            {strengths_html}
        </ul>

        <h2>⚠️ Trūkstošās Prasības</h2>
        <ul>
            {missing_html}
        </ul>
    </div>
</body>
</html>"#,
        index = index,
        color = color,
        score = assessment.match_score,
        verdict = escape_html(assessment.verdict.as_str()),
        summary = escape_html(&assessment.summary),
        strengths_html = strengths_html,
        missing_html = missing_html,
    )
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Verdict;

    fn assessment(verdict: Verdict, missing: Vec<&str>) -> Assessment {
        Assessment {
            match_score: 82,
            summary: "Kandidātam ir spēcīga backend pieredze.".to_string(),
            strengths: vec!["5 years backend experience".to_string()],
            missing_requirements: missing.into_iter().map(str::to_string).collect(),
            verdict,
        }
    }

    fn badge(html: &str) -> &str {
        let start = html.find("<div class=\"verdict\"").unwrap();
        let end = start + html[start..].find("</div>").unwrap();
        &html[start..end]
    }

    fn section_after<'a>(html: &'a str, heading: &str) -> &'a str {
        let start = html.find(heading).unwrap();
        let ul_start = start + html[start..].find("<ul>").unwrap();
        let ul_end = ul_start + html[ul_start..].find("</ul>").unwrap();
        &html[ul_start..ul_end]
    }

    #[test]
    fn test_possible_match_badge_and_placeholder() {
        let html = render_html(1, &assessment(Verdict::PossibleMatch, vec![]));

        assert!(html.contains("<title>CV1 Vērtējums</title>"));
        assert!(html.contains("<h1>CV1 Vērtējuma Pārskats</h1>"));
        assert!(html.contains("<div class=\"score\">82/100</div>"));

        let badge = badge(&html);
        assert!(badge.contains("style=\"background: #f59e0b;\""));
        // upper-casing is left to CSS
        assert!(badge.ends_with(">possible match"));
        assert!(html.contains("text-transform: uppercase;"));

        let missing = section_after(&html, "Trūkstošās Prasības</h2>");
        assert_eq!(missing.matches("<li>").count(), 1);
        assert!(missing.contains("<li><em>Nav identificētas būtiskas trūkstošas prasības.</em></li>"));
    }

    #[test]
    fn test_color_per_verdict() {
        let cases = [
            (Verdict::StrongMatch, "#22c55e"),
            (Verdict::PossibleMatch, "#f59e0b"),
            (Verdict::NotAMatch, "#ef4444"),
            (Verdict::Other("???".to_string()), "#6b7280"),
        ];
        for (verdict, color) in cases {
            let html = render_html(1, &assessment(verdict, vec![]));
            assert!(badge(&html).contains(color));
            assert!(html.contains(&format!("border-bottom: 3px solid {};", color)));
        }
    }

    #[test]
    fn test_lists_keep_order() {
        let mut a = assessment(Verdict::NotAMatch, vec!["Kubernetes", "AWS"]);
        a.strengths = vec!["Rust".to_string(), "SQL".to_string(), "Linux".to_string()];
        let html = render_html(2, &a);

        let strengths = section_after(&html, "Stiprās Puses</h2>");
        assert!(strengths.contains("<li>Rust</li><li>SQL</li><li>Linux</li>"));
        let missing = section_after(&html, "Trūkstošās Prasības</h2>");
        assert!(missing.contains("<li>Kubernetes</li><li>AWS</li>"));
        assert!(!missing.contains("<em>"));
    }

    #[test]
    fn test_model_text_is_escaped() {
        let mut a = assessment(Verdict::StrongMatch, vec!["<script>alert(1)</script>"]);
        a.summary = "C & C++ \"senior\"".to_string();
        let html = render_html(1, &a);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("C &amp; C++ &quot;senior&quot;"));
    }

    #[test]
    fn test_page_is_self_contained() {
        let html = render_html(1, &assessment(Verdict::StrongMatch, vec![]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
    }
}
