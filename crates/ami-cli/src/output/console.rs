//! Live scan progress on the terminal.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use ami_audit::{Category, Position, ScanEvent, ScanObserver};

use super::summary::paint;

/// Renders [`ScanEvent`]s as they arrive.
///
/// Verbose mode prints one line per event. Otherwise a progress bar counts
/// finished regions, and only skipped regions, vanished images and
/// unverified images get a line of their own.
pub struct ConsoleObserver {
    verbose: bool,
    to_stderr: bool,
    progress: Option<ProgressBar>,
}

impl ConsoleObserver {
    /// Create an observer; `to_stderr` keeps stdout free for structured output
    #[must_use]
    pub fn new(verbose: bool, to_stderr: bool) -> Self {
        let progress = (!verbose).then(|| {
            let pb = ProgressBar::hidden();
            if let Ok(style) =
                ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}/{len} regions")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        });
        Self {
            verbose,
            to_stderr,
            progress,
        }
    }

    /// Line printed for `event` in the current mode, if any
    #[must_use]
    pub fn render(&self, event: &ScanEvent) -> Option<String> {
        if self.verbose {
            verbose_line(event)
        } else {
            quiet_line(event)
        }
    }

    fn emit(&self, line: &str) {
        match &self.progress {
            Some(pb) if !pb.is_hidden() => pb.println(line),
            _ if self.to_stderr => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }

    fn on_progress(&self, event: &ScanEvent) {
        let Some(pb) = &self.progress else {
            return;
        };
        match event {
            ScanEvent::ScanStarted { regions } => {
                pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                pb.set_length(*regions as u64);
                pb.set_message("Scanning");
            }
            ScanEvent::RegionStarted { region } => pb.set_message(region.clone()),
            ScanEvent::RegionFinished { .. } | ScanEvent::RegionSkipped { .. } => pb.inc(1),
            ScanEvent::ScanFinished { .. } => pb.finish_and_clear(),
            _ => {}
        }
    }
}

impl ScanObserver for ConsoleObserver {
    fn notify(&self, event: &ScanEvent) {
        if let Some(line) = self.render(event) {
            self.emit(&line);
        }
        self.on_progress(event);
    }
}

fn prefix(position: Position, region: &str) -> String {
    format!("[{}/{}][{}]", position.index, position.total, region)
}

fn deleted_line(position: Position, region: &str, image_id: &str) -> String {
    format!("{} {image_id} has been deleted or made private.", prefix(position, region))
        .yellow()
        .to_string()
}

fn unverified_line(position: Position, region: &str, image_id: &str) -> String {
    let text = format!(
        "{} {image_id} is a community AMI from an unverified account.",
        prefix(position, region)
    );
    paint(&text, Category::Unverified).to_string()
}

/// Lines shown without `--verbose`: the findings and skipped regions.
#[must_use]
pub fn quiet_line(event: &ScanEvent) -> Option<String> {
    match event {
        ScanEvent::RegionSkipped { region, reason } => Some(
            format!("Skipping region {region}: {reason}")
                .red()
                .to_string(),
        ),
        ScanEvent::ImageUnresolved {
            region,
            image_id,
            error: None,
            position,
        } => Some(deleted_line(*position, region, image_id)),
        ScanEvent::ImageClassified {
            region,
            image_id,
            category: Category::Unverified,
            position,
        } => Some(unverified_line(*position, region, image_id)),
        _ => None,
    }
}

/// One line per event, or `None` for events with nothing to say.
#[must_use]
pub fn verbose_line(event: &ScanEvent) -> Option<String> {
    let line = match event {
        ScanEvent::ScanStarted { regions } => {
            format!("\nStarting AMI analysis across {regions} region(s)...")
        }
        ScanEvent::RegionStarted { region } => format!("[*] Checking region {region}"),
        ScanEvent::RegionSkipped { region, reason } => {
            format!("Error fetching instances for region {region}: {reason}")
                .red()
                .to_string()
        }
        ScanEvent::RegionListed { region, instances } => {
            format!("[*] {instances} instance(s) in {region}")
        }
        ScanEvent::InstanceWithoutImage {
            region,
            instance_id,
            position,
        } => format!("{} {instance_id} reports no image", prefix(*position, region))
            .dimmed()
            .to_string(),
        ScanEvent::ImageAlreadyProcessed {
            region,
            image_id,
            position,
        } => format!("{} {image_id} already processed. Skipping.", prefix(*position, region))
            .cyan()
            .to_string(),
        ScanEvent::ImageAnalyzing {
            region,
            image_id,
            instance_id,
            position,
        } => format!(
            "{} {image_id} being analyzed (Instance: {instance_id})",
            prefix(*position, region)
        ),
        ScanEvent::ImageUnresolved {
            region,
            image_id,
            error,
            position,
        } => match error {
            Some(err) => format!("Error fetching AMI details for {image_id}: {err}")
                .red()
                .to_string(),
            None => deleted_line(*position, region, image_id),
        },
        ScanEvent::ImageClassified {
            region,
            image_id,
            category,
            position,
        } => {
            let verdict = match category {
                Category::Verified => "is a community AMI from a verified account.",
                Category::Private => "is private.",
                Category::Unverified => return Some(unverified_line(*position, region, image_id)),
                // already reported by ImageUnresolved
                Category::Unknown => return None,
            };
            let text = format!("{} {image_id} {verdict}", prefix(*position, region));
            paint(&text, *category).to_string()
        }
        ScanEvent::RegionFinished { .. } | ScanEvent::ScanFinished { .. } => return None,
    };
    Some(line)
}
