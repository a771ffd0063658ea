//! Implements InputPort. Inquire-based interactive screens.
//!
//! Each menu visit mounts a fresh screen (use case), shows a spinner until its initial
//! fetch resolves, then renders and loops on user actions. Mutation failures are shown
//! as a blocking alert with a retry prompt.

use crate::adapters::ui::progress::spinner;
use crate::domain::{Complaint, ComplaintCategory, ComplaintPriority, DomainError, Member};
use crate::ports::{AuthPort, DocumentStore, InputPort};
use crate::usecases::complaints_service::{ComplaintsManager, StatusFilter};
use crate::usecases::payments_service::{PaymentsViewer, YearFilter};
use crate::usecases::profile_service::ProfileEditor;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use crossterm::style::Stylize;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::validator::Validation;
use inquire::{Confirm, InquireError, Select, Text};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Applies the prompt theme globally. Call once at startup.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightCyan))
        .with_highlighted_option_prefix(Styled::new("▸").with_fg(Color::LightYellow))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

fn ui_err(e: InquireError) -> DomainError {
    DomainError::Ui(e.to_string())
}

fn alert(message: &str) {
    println!("\n{} {}\n", "✖".red().bold(), message.red());
}

fn opt(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("-")
}

fn required(
    label: &'static str,
) -> impl Fn(&str) -> Result<Validation, inquire::CustomUserError> + Clone {
    move |s: &str| {
        if s.trim().is_empty() {
            Ok(Validation::Invalid(format!("{} is required", label).into()))
        } else {
            Ok(Validation::Valid)
        }
    }
}

/// Text prompt seeded with the current value.
fn prompt_text(label: &str, current: &str) -> Result<String, DomainError> {
    Text::new(label)
        .with_initial_value(current)
        .prompt()
        .map_err(ui_err)
}

/// Blank input clears the field.
fn prompt_optional_text(
    label: &str,
    current: &Option<String>,
) -> Result<Option<String>, DomainError> {
    let s = prompt_text(label, current.as_deref().unwrap_or_default())?;
    let s = s.trim();
    Ok((!s.is_empty()).then(|| s.to_string()))
}

/// Calendar date in the member's local time zone.
fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Trimmed `YYYY-MM-DD` input; blank means cleared.
fn parse_optional_date(s: &str) -> Result<Option<String>, &'static str> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| Some(d.format("%Y-%m-%d").to_string()))
        .map_err(|_| "use YYYY-MM-DD")
}

/// Optional `YYYY-MM-DD` date; blank clears the field.
fn prompt_optional_date(
    label: &str,
    current: &Option<String>,
) -> Result<Option<String>, DomainError> {
    let s = Text::new(label)
        .with_initial_value(current.as_deref().unwrap_or_default())
        .with_help_message("leave blank to clear")
        .with_validator(|s: &str| match parse_optional_date(s) {
            Ok(_) => Ok(Validation::Valid),
            Err(msg) => Ok(Validation::Invalid(msg.into())),
        })
        .prompt()
        .map_err(ui_err)?;
    parse_optional_date(&s).map_err(|msg| DomainError::Validation(msg.to_string()))
}

/// Optional positive number; blank clears the field.
fn prompt_optional_number(label: &str, current: Option<f64>) -> Result<Option<f64>, DomainError> {
    let initial = current.map(|v| v.to_string()).unwrap_or_default();
    let s = Text::new(label)
        .with_initial_value(&initial)
        .with_help_message("leave blank to clear")
        .with_validator(|s: &str| {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Validation::Valid);
            }
            match s.parse::<f64>() {
                Ok(v) if v > 0.0 && v.is_finite() => Ok(Validation::Valid),
                _ => Ok(Validation::Invalid("enter a positive number".into())),
            }
        })
        .prompt()
        .map_err(ui_err)?;
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|e| DomainError::Ui(e.to_string()))
}

/// TUI adapter. Drives the three member settings screens.
pub struct TuiInputPort {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthPort>,
    notice_ttl: Duration,
    export_dir: PathBuf,
}

impl TuiInputPort {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthPort>,
        notice_ttl: Duration,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            auth,
            notice_ttl,
            export_dir,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Profile
    // ─────────────────────────────────────────────────────────────────────────

    async fn profile_screen(&self) -> Result<(), DomainError> {
        let mut editor = ProfileEditor::new(Arc::clone(&self.store), Arc::clone(&self.auth))
            .with_notice_ttl(self.notice_ttl);
        let pb = spinner("Loading profile...");
        editor.load().await;
        pb.finish_and_clear();

        loop {
            let Some(profile) = editor.profile() else {
                println!("No profile available.");
                return Ok(());
            };
            render_profile(profile);
            if let Some(notice) = editor.notice(Instant::now()) {
                println!("{} {}\n", "✔".green().bold(), notice.message.as_str().green());
            }

            let choice = Select::new("Profile", vec!["Edit profile", "Back"])
                .prompt()
                .map_err(ui_err)?;
            if choice == "Back" {
                return Ok(());
            }
            editor.begin_edit();
            self.edit_profile(&mut editor).await?;
        }
    }

    async fn edit_profile(&self, editor: &mut ProfileEditor) -> Result<(), DomainError> {
        let Some(draft) = editor.draft().cloned() else {
            return Ok(());
        };
        let name = prompt_text("Name:", &draft.name)?;
        let email = prompt_text("Email:", &draft.email)?;
        let phone = prompt_text("Phone:", &draft.phone)?;
        let gender = prompt_optional_text("Gender:", &draft.gender)?;
        let date_of_birth = prompt_optional_date("Date of birth:", &draft.date_of_birth)?;
        let address = prompt_optional_text("Address:", &draft.address)?;
        let weight = prompt_optional_number("Weight (kg):", draft.weight)?;
        let height = prompt_optional_number("Height (cm):", draft.height)?;
        let medical_conditions =
            prompt_optional_text("Medical conditions:", &draft.medical_conditions)?;
        let allergies = prompt_optional_text("Allergies:", &draft.allergies)?;
        let medications = prompt_optional_text("Medications:", &draft.medications)?;
        let mut contact = draft.emergency_contact.clone().unwrap_or_default();
        contact.name = prompt_text("Emergency contact name:", &contact.name)?;
        contact.phone = prompt_text("Emergency contact phone:", &contact.phone)?;
        contact.relation = prompt_text("Emergency contact relation:", &contact.relation)?;

        editor.edit(|m| {
            m.name = name;
            m.email = email;
            m.phone = phone;
            m.gender = gender;
            m.date_of_birth = date_of_birth;
            m.address = address;
            m.weight = weight;
            m.height = height;
            m.medical_conditions = medical_conditions;
            m.allergies = allergies;
            m.medications = medications;
            m.emergency_contact = Some(contact);
        });

        match editor.preview_bmi() {
            Some(bmi) => println!("BMI preview: {:.1} ({})", bmi.value, bmi.category),
            None => println!("BMI preview: enter weight and height"),
        }

        loop {
            let action = Select::new("Apply changes?", vec!["Save", "Cancel"])
                .prompt()
                .map_err(ui_err)?;
            if action == "Cancel" {
                editor.cancel();
                return Ok(());
            }
            match editor.save(Instant::now()).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    alert(&format!("Failed to update profile: {}", e));
                    let retry = Confirm::new("Try again?")
                        .with_default(true)
                        .prompt()
                        .map_err(ui_err)?;
                    if !retry {
                        editor.cancel();
                        return Ok(());
                    }
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Complaints
    // ─────────────────────────────────────────────────────────────────────────

    async fn complaints_screen(&self) -> Result<(), DomainError> {
        let mut manager = ComplaintsManager::new(Arc::clone(&self.store), Arc::clone(&self.auth));
        let pb = spinner("Loading complaints...");
        manager.load().await;
        pb.finish_and_clear();
        if manager.is_loading() {
            println!("Sign in to see your complaints.");
            return Ok(());
        }

        loop {
            render_complaints(&manager);
            let choice = Select::new(
                "Complaints",
                vec!["New complaint", "Filter by status", "View details", "Back"],
            )
            .prompt()
            .map_err(ui_err)?;
            match choice {
                "New complaint" => self.new_complaint(&mut manager).await?,
                "Filter by status" => {
                    let labels: Vec<String> = manager
                        .status_counts()
                        .into_iter()
                        .map(|(f, n)| format!("{} ({})", f, n))
                        .collect();
                    let picked = Select::new("Show", labels).raw_prompt().map_err(ui_err)?;
                    manager.set_filter(StatusFilter::OPTIONS[picked.index]);
                }
                "View details" => {
                    let ids: Vec<String> = manager.visible().iter().map(|c| c.id.clone()).collect();
                    if ids.is_empty() {
                        println!("Nothing to show.");
                        continue;
                    }
                    let labels: Vec<String> = manager
                        .visible()
                        .into_iter()
                        .map(complaint_line)
                        .collect();
                    let picked = Select::new("Complaint", labels).raw_prompt().map_err(ui_err)?;
                    manager.open_detail(&ids[picked.index])?;
                    if let Some(c) = manager.detail() {
                        render_complaint_detail(c);
                    }
                    Confirm::new("Close?")
                        .with_default(true)
                        .prompt()
                        .map_err(ui_err)?;
                    manager.close_modal();
                }
                _ => return Ok(()),
            }
        }
    }

    async fn new_complaint(&self, manager: &mut ComplaintsManager) -> Result<(), DomainError> {
        manager.open_new_complaint()?;
        let subject = Text::new("Subject:")
            .with_validator(required("subject"))
            .prompt()
            .map_err(ui_err)?;
        let category = Select::new("Category:", ComplaintCategory::ALL.to_vec())
            .prompt()
            .map_err(ui_err)?;
        let priority = Select::new("Priority:", ComplaintPriority::ALL.to_vec())
            .with_starting_cursor(1)
            .prompt()
            .map_err(ui_err)?;
        let description = Text::new("Description:")
            .with_validator(required("description"))
            .prompt()
            .map_err(ui_err)?;
        let is_anonymous = Confirm::new("Submit anonymously?")
            .with_default(false)
            .prompt()
            .map_err(ui_err)?;
        if let Some(form) = manager.form_mut() {
            form.subject = subject;
            form.category = category;
            form.priority = priority;
            form.description = description;
            form.is_anonymous = is_anonymous;
        }

        loop {
            match manager.submit(Utc::now()).await {
                Ok(id) => {
                    println!("{} Complaint submitted ({})\n", "✔".green().bold(), id);
                    return Ok(());
                }
                Err(e) => {
                    alert(&format!("Failed to submit complaint: {}", e));
                    let retry = Confirm::new("Try again?")
                        .with_default(true)
                        .prompt()
                        .map_err(ui_err)?;
                    if !retry {
                        manager.close_modal();
                        return Ok(());
                    }
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────

    async fn payments_screen(&self) -> Result<(), DomainError> {
        let mut viewer = PaymentsViewer::new(Arc::clone(&self.store), Arc::clone(&self.auth));
        let pb = spinner("Loading payments...");
        viewer.load().await;
        pb.finish_and_clear();

        loop {
            render_payments(&viewer);
            let choice = Select::new("Payments", vec!["Filter by year", "Export CSV", "Back"])
                .prompt()
                .map_err(ui_err)?;
            match choice {
                "Filter by year" => {
                    let today = local_today();
                    let mut options = vec![YearFilter::All];
                    options.extend(
                        viewer
                            .summary(&today)
                            .available_years
                            .into_iter()
                            .map(YearFilter::Year),
                    );
                    let picked = Select::new("Year", options).prompt().map_err(ui_err)?;
                    viewer.set_year_filter(picked);
                }
                "Export CSV" => match self.export_payments(&viewer).await {
                    Ok(path) => println!("Exported to {}\n", path.display()),
                    Err(e) => alert(&format!("Export failed: {}", e)),
                },
                _ => return Ok(()),
            }
        }
    }

    async fn export_payments(&self, viewer: &PaymentsViewer) -> Result<PathBuf, DomainError> {
        let csv = viewer.export_csv()?;
        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| DomainError::Store(format!("create export dir: {}", e)))?;
        let suffix = match viewer.year_filter() {
            YearFilter::All => "all".to_string(),
            YearFilter::Year(y) => y.to_string(),
        };
        let path = self.export_dir.join(format!("payments_{}.csv", suffix));
        tokio::fs::write(&path, csv)
            .await
            .map_err(|e| DomainError::Store(format!("write export: {}", e)))?;
        info!(path = %path.display(), "payments exported");
        Ok(path)
    }
}

fn render_profile(m: &Member) {
    println!("\n{}", m.name.as_str().bold());
    println!("  Email:      {}", m.email);
    println!("  Phone:      {}", m.phone);
    println!("  Address:    {}", opt(&m.address));
    println!("  Level:      {}  ({})", opt(&m.membership_level), m.status);
    let weight = m.weight.map(|w| format!("{} kg", w)).unwrap_or_else(|| "-".into());
    let height = m.height.map(|h| format!("{} cm", h)).unwrap_or_else(|| "-".into());
    println!("  Weight:     {}   Height: {}", weight, height);
    match (m.bmi, m.bmi_category) {
        (Some(bmi), Some(cat)) => println!("  BMI:        {:.1} ({})", bmi, cat),
        _ => println!("  BMI:        -"),
    }
    println!("  Medical:    {}", opt(&m.medical_conditions));
    println!("  Allergies:  {}", opt(&m.allergies));
    println!("  Medication: {}", opt(&m.medications));
    if let Some(c) = &m.emergency_contact {
        println!("  Emergency:  {} ({}) {}", c.name, c.relation, c.phone);
    }
    println!();
}

fn complaint_line(c: &Complaint) -> String {
    format!(
        "[{}] {} · {} · {} · {}",
        c.status,
        c.subject,
        c.category,
        c.priority,
        c.created_at.format("%Y-%m-%d")
    )
}

fn render_complaints(manager: &ComplaintsManager) {
    let counts: Vec<String> = manager
        .status_counts()
        .into_iter()
        .map(|(f, n)| format!("{}: {}", f, n))
        .collect();
    println!("\n{}  ({})", "My complaints".bold(), counts.join(" | "));
    println!("Filter: {}", manager.filter());
    let visible = manager.visible();
    if visible.is_empty() {
        println!("  No complaints.");
    }
    for c in visible {
        println!("  {}", complaint_line(c));
    }
    println!();
}

fn render_complaint_detail(c: &Complaint) {
    println!("\n{}", c.subject.as_str().bold());
    println!("  Status:    {}", c.status);
    println!("  Category:  {}   Priority: {}", c.category, c.priority);
    println!("  Filed by:  {}   on {}", c.member_name, c.created_at.format("%Y-%m-%d %H:%M"));
    println!("  {}", c.description);
    if c.responses.is_empty() {
        println!("\n  No responses yet.");
    } else {
        println!("\n  Responses:");
        for r in &c.responses {
            println!(
                "  - {} ({}): {}",
                r.responded_by,
                r.responded_at.format("%Y-%m-%d %H:%M"),
                r.message
            );
        }
    }
    println!();
}

fn render_payments(viewer: &PaymentsViewer) {
    let today = local_today();
    let summary = viewer.summary(&today);
    if let Some(m) = viewer.member() {
        println!("\n{}  {}", m.name.as_str().bold(), opt(&m.membership_level));
    }
    if summary.current_month_paid {
        println!("  {} {}", summary.current_month, "PAID".green().bold());
    } else {
        println!("  {} {}", summary.current_month, "NOT PAID".red().bold());
    }
    println!(
        "  Payments: {}   Total: {:.2}",
        summary.total_count, summary.total_amount
    );
    println!("  Showing:  {}", viewer.year_filter());
    let visible = viewer.visible();
    if visible.is_empty() {
        println!("  No payments.");
    }
    for p in visible {
        let amount = p.amount.map(|a| format!("{:.2}", a)).unwrap_or_else(|| "-".into());
        println!(
            "  {}  {:>10}  {:<14} {}",
            p.month,
            amount,
            p.payment_method.to_string(),
            p.paid_at.format("%Y-%m-%d")
        );
    }
    println!();
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = Select::new(
                "Member settings",
                vec!["Profile", "Complaints", "Payments", "Quit"],
            )
            .prompt();
            let choice = match choice {
                Ok(c) => c,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(ui_err(e)),
            };
            let result = match choice {
                "Profile" => self.profile_screen().await,
                "Complaints" => self.complaints_screen().await,
                "Payments" => self.payments_screen().await,
                _ => return Ok(()),
            };
            // Esc inside a screen drops back to this menu.
            if let Err(e) = result {
                warn!(error = %e, "screen closed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_date_input() {
        assert_eq!(parse_optional_date("  "), Ok(None));
        assert_eq!(
            parse_optional_date(" 1990-04-07 "),
            Ok(Some("1990-04-07".to_string()))
        );
        assert!(parse_optional_date("07/04/1990").is_err());
        assert!(parse_optional_date("1990-02-30").is_err());
    }

    #[test]
    fn test_today_uses_local_calendar() {
        let before = Local::now().date_naive();
        let today = local_today();
        let after = Local::now().date_naive();
        assert!(today == before || today == after);
    }
}
