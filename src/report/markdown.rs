use super::{verdict_emoji, NO_MISSING_REQUIREMENTS};
use crate::domain::model::Assessment;
use std::fmt::Write;

pub fn render_markdown(index: usize, assessment: &Assessment) -> String {
    let mut report = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(report, "# CV{} Vērtējuma Pārskats", index);
    report.push('\n');
    let _ = writeln!(report, "**Vērtējums:** {}/100  ", assessment.match_score);
    let _ = writeln!(
        report,
        "**Nolēmums:** {} {}",
        verdict_emoji(&assessment.verdict),
        assessment.verdict.as_str().to_uppercase()
    );
    report.push('\n');
    let _ = writeln!(report, "{}", assessment.summary);
    report.push('\n');

    report.push_str("## Stiprās Puses\n");
    for strength in &assessment.strengths {
        let _ = writeln!(report, "- {}", strength);
    }

    report.push_str("\n## Trūkstošās Prasības\n");
    if assessment.missing_requirements.is_empty() {
        let _ = writeln!(report, "*{}*", NO_MISSING_REQUIREMENTS);
    } else {
        for missing in &assessment.missing_requirements {
            let _ = writeln!(report, "- {}", missing);
        }
    }

    report
}
