use std::fmt::Write;

use crate::models::{GuideCandidate, ScanResult};
use crate::scanner::{GUIDE_LEN, MIN_SEQUENCE_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseClass {
    Plain,
    Guide,
    Pam,
}

impl BaseClass {
    fn style(self) -> Option<&'static str> {
        match self {
            BaseClass::Plain => None,
            BaseClass::Guide => Some("background-color:#FFDD57;color:black"),
            BaseClass::Pam => Some("background-color:#FF5733;color:white"),
        }
    }
}

/// Class of every base; guides later in the list paint over earlier ones.
pub fn classify_bases(len: usize, guides: &[GuideCandidate]) -> Vec<BaseClass> {
    let mut classes = vec![BaseClass::Plain; len];
    for guide in guides {
        let start = guide.position;
        let pam_start = start + GUIDE_LEN;
        let pam_end = start + MIN_SEQUENCE_LEN;
        for i in start..pam_start.min(len) {
            classes[i] = BaseClass::Guide;
        }
        for i in pam_start.min(len)..pam_end.min(len) {
            classes[i] = BaseClass::Pam;
        }
    }
    classes
}

fn escape_char(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Monospace `<div>` with one `<span>` per run of guide or PAM bases.
pub fn render_sequence_map(sequence: &str, guides: &[GuideCandidate]) -> String {
    let bases: Vec<char> = sequence.chars().collect();
    let classes = classify_bases(bases.len(), guides);

    let mut out = String::from("<div style='font-family: monospace; word-wrap: break-word'>");
    let mut current = BaseClass::Plain;
    for (base, class) in bases.iter().zip(&classes) {
        if *class != current {
            if current != BaseClass::Plain {
                out.push_str("</span>");
            }
            if let Some(style) = class.style() {
                let _ = write!(out, "<span style='{}'>", style);
            }
            current = *class;
        }
        escape_char(&mut out, *base);
    }
    if current != BaseClass::Plain {
        out.push_str("</span>");
    }
    out.push_str("</div>");
    out
}

pub fn render_page(result: &ScanResult) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html><head><meta charset='utf-8'><title>gRNA Position Map</title></head><body>\n");
    out.push_str("<h3>gRNA Position Map</h3>\n<p>Source: ");
    for c in result.source.to_string().chars() {
        escape_char(&mut out, c);
    }
    let _ = writeln!(out, " &middot; {} guides</p>", result.guides.len());
    out.push_str(&render_sequence_map(&result.sequence, &result.guides));
    out.push_str("\n</body></html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provenance;

    fn guide_at(position: usize) -> GuideCandidate {
        GuideCandidate {
            guide: String::new(),
            pam: String::new(),
            position,
            score: 0.5,
        }
    }

    #[test]
    fn guide_then_pam_then_plain() {
        let classes = classify_bases(25, &[guide_at(1)]);
        assert_eq!(classes[0], BaseClass::Plain);
        assert!(classes[1..21].iter().all(|c| *c == BaseClass::Guide));
        assert!(classes[21..24].iter().all(|c| *c == BaseClass::Pam));
        assert_eq!(classes[24], BaseClass::Plain);
    }

    #[test]
    fn later_guides_win_overlaps() {
        let classes = classify_bases(30, &[guide_at(0), guide_at(2)]);
        // First guide's PAM (20..23) falls inside the second guide.
        assert!(classes[20..22].iter().all(|c| *c == BaseClass::Guide));
        assert!(classes[22..25].iter().all(|c| *c == BaseClass::Pam));
    }

    #[test]
    fn runs_are_merged_into_single_spans() {
        let seq = format!("T{}AGGT", "C".repeat(20));
        let html = render_sequence_map(&seq, &[guide_at(1)]);
        assert_eq!(html.matches("<span").count(), 2);
        assert!(html.contains(&format!(
            "T<span style='background-color:#FFDD57;color:black'>{}</span>",
            "C".repeat(20)
        )));
        assert!(html.contains("<span style='background-color:#FF5733;color:white'>AGG</span>T</div>"));
    }

    #[test]
    fn markup_in_sequence_is_escaped() {
        let html = render_sequence_map("<script>", &[]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn page_names_the_source() {
        let result = ScanResult {
            guides: vec![],
            source: Provenance::Gene("TP53".into()),
            sequence: "ACGT".into(),
        };
        let page = render_page(&result);
        assert!(page.contains("Source: TP53"));
        assert!(page.contains("0 guides"));
    }
}
