//! Summary key, tallies and structured report output.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use tabled::{settings::Style, Table, Tabled};

use ami_audit::{AuditSummary, Category, Report};

use super::OutputFormat;

#[derive(Tabled)]
struct KeyRow {
    #[tabled(rename = "Term")]
    term: String,
    #[tabled(rename = "Definition")]
    definition: &'static str,
}

fn term(category: Category) -> &'static str {
    match category {
        Category::Private => "Private",
        Category::Verified => "Public & Verified",
        Category::Unknown => "Unknown",
        Category::Unverified => "Public & Unverified",
    }
}

fn definition(category: Category) -> &'static str {
    match category {
        Category::Private => "Images served from this account that are private",
        Category::Verified => "Images from verified accounts (verified by Amazon)",
        Category::Unknown => {
            "Images in use that are no longer available. They may have been deleted \
             or made private, so we cannot tell whether they came from a verified account"
        }
        Category::Unverified => {
            "Images from unverified accounts. Be cautious with these unless they come \
             from accounts you control; otherwise replace them with images from \
             verified accounts"
        }
    }
}

/// Paint `text` in the color used for `category`.
pub fn paint(text: &str, category: Category) -> ColoredString {
    match category {
        Category::Private | Category::Verified => text.green(),
        Category::Unknown => text.yellow(),
        Category::Unverified => text.red(),
    }
}

/// Legend explaining each category.
#[must_use]
pub fn key_table() -> String {
    let order = [
        Category::Private,
        Category::Verified,
        Category::Unknown,
        Category::Unverified,
    ];
    let rows: Vec<KeyRow> = order
        .into_iter()
        .map(|c| KeyRow {
            term: paint(term(c), c).to_string(),
            definition: definition(c),
        })
        .collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}

/// Tally lines, labels right-aligned.
#[must_use]
pub fn tally_lines(summary: &AuditSummary) -> Vec<String> {
    let mut lines = vec![
        format!("{:>24}: {}", "Total Instances", summary.total_instances)
            .cyan()
            .to_string(),
        format!("{:>24}: {}", "Total AMIs", summary.total_images)
            .cyan()
            .to_string(),
    ];
    let labelled = [
        (Category::Private, "Private AMIs"),
        (Category::Verified, "Public & Verified AMIs"),
        (Category::Unknown, "AMIs w/ Unknown status"),
        (Category::Unverified, "Public & Unverified AMIs"),
    ];
    for (category, label) in labelled {
        let line = format!("{:>24}: {}", label, summary.count(category));
        lines.push(paint(&line, category).to_string());
    }
    lines
}

/// Print the summary in the requested format.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
        OutputFormat::Pretty => {
            println!();
            println!("{}", "Summary Key:".bold());
            println!("{}", key_table());

            println!();
            println!("{}", "Summary:".bold());
            for line in tally_lines(&report.summary) {
                println!("{line}");
            }

            if !report.skipped_regions.is_empty() {
                println!();
                println!(
                    "{} {}",
                    "Skipped regions:".yellow().bold(),
                    report.skipped_regions.join(", ")
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lists_every_category() {
        colored::control::set_override(false);
        let table = key_table();
        for category in Category::ALL {
            assert!(table.contains(term(category)));
        }
    }

    #[test]
    fn tallies_are_aligned() {
        colored::control::set_override(false);
        let summary = AuditSummary {
            total_instances: 4,
            total_images: 3,
            private: 0,
            verified: 1,
            unknown: 1,
            unverified: 1,
        };
        let lines = tally_lines(&summary);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "         Total Instances: 4");
        assert_eq!(lines[5], "Public & Unverified AMIs: 1");
        assert!(lines.iter().all(|l| l.find(':') == Some(24)));
    }
}
