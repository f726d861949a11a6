use std::{fmt::Write as _, path::Path, path::PathBuf};

use chrono::{DateTime, Local};

use crate::{
    cards::{CardImage, CardResolver},
    roster::{BudgetStatus, ForceRoster, PrintGroup},
};

use super::wait::CardReadiness;

/// Cards per printed page.
pub const CARDS_PER_PAGE: usize = 9;
/// Columns in the card grid.
pub const GRID_COLUMNS: usize = 3;
/// Physical card width in inches.
pub const CARD_WIDTH_IN: f32 = 2.5;
/// Physical card height in inches.
pub const CARD_HEIGHT_IN: f32 = 3.5;

/// Split cards into pages of [`CARDS_PER_PAGE`].
pub fn paginate(cards: &[CardImage]) -> Vec<&[CardImage]> {
    cards.chunks(CARDS_PER_PAGE).collect()
}

/// Everything needed to print a force: summary table plus card grid.
#[derive(Debug, Clone)]
pub struct PrintDocument {
    pub title: String,
    pub generated_at: DateTime<Local>,
    pub rows: Vec<PrintGroup>,
    pub budget: BudgetStatus,
    /// One card per force entry, in roster order.
    pub cards: Vec<CardImage>,
}

impl PrintDocument {
    pub fn build(roster: &ForceRoster, resolver: &CardResolver, generated_at: DateTime<Local>) -> Self {
        let cards = roster
            .entries()
            .iter()
            .map(|entry| resolver.resolve(entry.unit()))
            .collect();
        Self {
            title: "Alpha Strike Force".to_string(),
            generated_at,
            rows: roster.group_for_print(),
            budget: roster.budget(),
            cards,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn pages(&self) -> Vec<&[CardImage]> {
        paginate(&self.cards)
    }

    pub fn page_count(&self) -> usize {
        self.cards.len().div_ceil(CARDS_PER_PAGE)
    }

    /// Distinct real card images the document refers to.
    pub fn card_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for card in self.cards.iter().filter(|card| !card.placeholder) {
            if !paths.contains(&card.path) {
                paths.push(card.path.clone());
            }
        }
        paths
    }

    /// Swap in the placeholder for every card that failed to load.
    pub fn apply_readiness(&mut self, readiness: &CardReadiness, placeholder: &Path) {
        for card in &mut self.cards {
            if card.placeholder {
                continue;
            }
            let unsettled = readiness.timed_out && !readiness.ready.contains(&card.path);
            if unsettled || readiness.missing.contains(&card.path) {
                card.label = format!("{} (card missing)", card.label);
                card.path = placeholder.to_path_buf();
                card.placeholder = true;
            }
        }
    }

    /// Self-contained HTML with inline styles and local image references only.
    pub fn render_html(&self) -> String {
        let mut html = String::with_capacity(4096);
        let title = escape_html(&self.title);

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{title}</title>");
        html.push_str("<style>\n");
        html.push_str("@page { margin: 0.25in; }\n");
        html.push_str("body { font-family: Arial, sans-serif; margin: 0; }\n");
        html.push_str(".force-summary { margin-bottom: 2rem; }\n");
        html.push_str("table { border-collapse: collapse; }\n");
        html.push_str("th, td { border: 1px solid #444; padding: 4px 10px; text-align: left; }\n");
        html.push_str("tr.total td { font-weight: bold; }\n");
        html.push_str(".over-budget { color: #b00020; font-weight: bold; }\n");
        let _ = writeln!(
            html,
            ".page {{ display: grid; grid-template-columns: repeat({GRID_COLUMNS}, {CARD_WIDTH_IN}in); grid-auto-rows: {CARD_HEIGHT_IN}in; page-break-inside: avoid; }}"
        );
        html.push_str(".page.break { page-break-before: always; break-before: page; }\n");
        let _ = writeln!(
            html,
            ".card {{ width: {CARD_WIDTH_IN}in; height: {CARD_HEIGHT_IN}in; overflow: hidden; position: relative; }}"
        );
        html.push_str(".card img { width: 100%; height: 100%; object-fit: contain; }\n");
        html.push_str(".card .caption { position: absolute; bottom: 0; width: 100%; text-align: center; font-size: 9pt; background: rgba(255,255,255,0.8); }\n");
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str("<div class=\"force-summary\">\n");
        let _ = writeln!(html, "<h1>{title}</h1>");
        let _ = writeln!(
            html,
            "<p>Generated {}</p>",
            escape_html(&self.generated_at.format("%Y-%m-%d %H:%M").to_string())
        );
        html.push_str("<table>\n<thead><tr><th>Unit</th><th>Experience</th><th>Points</th><th>Count</th></tr></thead>\n<tbody>\n");
        for row in &self.rows {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.name),
                row.experience.label(),
                row.points_each,
                row.count
            );
        }
        let _ = writeln!(
            html,
            "<tr class=\"total\"><td colspan=\"2\">Total Points</td><td>{}</td><td>{}</td></tr>",
            self.budget.total,
            self.cards.len()
        );
        html.push_str("</tbody>\n</table>\n");
        if self.budget.over_budget {
            let _ = writeln!(
                html,
                "<p class=\"over-budget\">Over the {} point limit by {}</p>",
                self.budget.limit, self.budget.overage
            );
        } else {
            let _ = writeln!(html, "<p>Point limit: {}</p>", self.budget.limit);
        }
        html.push_str("</div>\n");

        for (idx, page) in self.pages().iter().enumerate() {
            let class = if idx == 0 { "page" } else { "page break" };
            let _ = writeln!(html, "<div class=\"{class}\">");
            for card in page.iter() {
                let label = escape_html(&card.label);
                let _ = write!(
                    html,
                    "<div class=\"card\"><img src=\"{}\" alt=\"{label}\">",
                    escape_html(&file_url(&card.path))
                );
                if card.placeholder {
                    let _ = write!(html, "<div class=\"caption\">{label}</div>");
                }
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

/// `file://` URL for a local path with reserved characters percent-encoded.
pub fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let mut encoded = String::with_capacity(raw.len() + 8);
    encoded.push_str("file://");
    if !raw.starts_with('/') {
        encoded.push('/');
    }
    for ch in raw.chars() {
        match ch {
            ' ' => encoded.push_str("%20"),
            '#' => encoded.push_str("%23"),
            '%' => encoded.push_str("%25"),
            '?' => encoded.push_str("%3F"),
            '"' => encoded.push_str("%22"),
            _ => encoded.push(ch),
        }
    }
    encoded
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Experience, UnitDefinition, UnitType};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn card(name: &str) -> CardImage {
        CardImage {
            path: PathBuf::from(format!("/cards/{name}.gif")),
            label: name.to_string(),
            placeholder: false,
        }
    }

    fn timestamp() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 4, 18, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn paginates_nine_per_page() {
        let cards: Vec<_> = (0..20).map(|idx| card(&format!("u{idx}"))).collect();
        let pages = paginate(&cards);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].len(), 9);
        assert_eq!(pages[2].len(), 2);
        assert!(paginate(&[]).is_empty());
    }

    #[test]
    fn renders_summary_and_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolver = CardResolver::new(dir.path(), dir.path().join("placeholder.png"));
        let mut roster = ForceRoster::with_limit(10);
        let striker = Arc::new(UnitDefinition::new("Striker <LRM>", UnitType::Vehicle, 4, 6.0));
        for _ in 0..9 {
            roster.add(Arc::clone(&striker), Experience::Regular);
        }
        roster.add(striker, Experience::Veteran);

        let document = PrintDocument::build(&roster, &resolver, timestamp());
        assert_eq!(document.rows.len(), 2);
        assert_eq!(document.page_count(), 2);
        assert!(document.card_paths().is_empty(), "all cards are placeholders");

        let html = document.render_html();
        assert!(html.contains("<th>Unit</th><th>Experience</th><th>Points</th><th>Count</th>"));
        assert!(html.contains("<td>Striker &lt;LRM&gt;</td><td>Regular</td><td>4</td><td>9</td>"));
        assert!(html.contains("<td>Striker &lt;LRM&gt;</td><td>Veteran</td><td>6</td><td>1</td>"));
        assert!(html.contains("<td colspan=\"2\">Total Points</td><td>42</td>"));
        assert!(html.contains("Over the 10 point limit by 32"));
        assert_eq!(html.matches("<div class=\"page\">").count(), 1);
        assert_eq!(html.matches("<div class=\"page break\">").count(), 1);
        assert_eq!(html.matches("<div class=\"card\">").count(), 10);
        assert!(!html.contains("http://") && !html.contains("https://"));
    }

    #[test]
    fn readiness_swaps_missing_cards() {
        let mut document = PrintDocument {
            title: "Test".to_string(),
            generated_at: timestamp(),
            rows: Vec::new(),
            budget: BudgetStatus::new(0, 32),
            cards: vec![card("A"), card("B"), card("A")],
        };
        assert_eq!(document.card_paths().len(), 2);

        let readiness = CardReadiness {
            ready: vec![PathBuf::from("/cards/B.gif")],
            missing: vec![PathBuf::from("/cards/A.gif")],
            timed_out: false,
        };
        document.apply_readiness(&readiness, Path::new("/cards/placeholder.png"));
        assert!(document.cards[0].placeholder);
        assert!(!document.cards[1].placeholder);
        assert!(document.cards[2].placeholder);
        assert_eq!(document.cards[0].label, "A (card missing)");
    }

    #[test]
    fn readiness_swaps_cards_unsettled_at_timeout() {
        let mut document = PrintDocument {
            title: "Test".to_string(),
            generated_at: timestamp(),
            rows: Vec::new(),
            budget: BudgetStatus::new(0, 32),
            cards: vec![card("Hung"), card("Loaded")],
        };
        let readiness = CardReadiness {
            ready: vec![PathBuf::from("/cards/Loaded.gif")],
            missing: Vec::new(),
            timed_out: true,
        };
        document.apply_readiness(&readiness, Path::new("/cards/placeholder.png"));

        assert!(document.cards[0].placeholder);
        assert_eq!(document.cards[0].path, PathBuf::from("/cards/placeholder.png"));
        assert_eq!(document.cards[0].label, "Hung (card missing)");
        assert!(!document.cards[1].placeholder);
        assert_eq!(document.cards[1].path, PathBuf::from("/cards/Loaded.gif"));
    }

    #[test]
    fn encodes_file_urls() {
        assert_eq!(
            file_url(Path::new("/cards/Scorpion Light Tank.gif")),
            "file:///cards/Scorpion%20Light%20Tank.gif"
        );
    }
}
