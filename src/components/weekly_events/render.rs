use super::models::{NormalizedEvent, WeekSnapshot};
use super::time::resolve_day;
use crate::calendar::MonthView;
use crate::error::PortalResult;
use crate::utils::time::format_clock;
use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info};

/// Title shown when an event has none
pub const UNTITLED_EVENT: &str = "Evento";

/// Paints a normalized week into some UI.
///
/// `render` receives every successful cycle's snapshot, always with all
/// seven slots. It must treat the snapshot as read-only.
pub trait RenderingAdapter: Send + Sync {
    fn render(&self, snapshot: &WeekSnapshot) -> PortalResult<()>;

    /// Busy indicator, toggled around each refresh cycle
    fn set_busy(&self, _busy: bool) {}
}

/// Display-ready fields of one week slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub day_number: String,
    pub month_label: String,
    pub day_name: String,
    pub title: String,
    pub description: String,
    pub schedule: String,
    pub location: String,
    pub link: String,
    pub placeholder: bool,
}

impl EventCard {
    pub fn build(event: &NormalizedEvent, today: NaiveDate) -> Self {
        let (day_number, month_label, day_name) = match resolve_day(event.dia_semana, today) {
            Some(resolved) => (
                resolved.day_number(),
                resolved.month_label(),
                resolved.week_day.name().to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        let title = match event.titulo.trim() {
            "" => UNTITLED_EVENT.to_string(),
            title => title.to_string(),
        };

        Self {
            day_number,
            month_label,
            day_name,
            title,
            description: event.descricao.trim().to_string(),
            schedule: schedule_text(&event.hora_inicio, &event.hora_fim),
            location: event.local.trim().to_string(),
            link: event.link.trim().to_string(),
            placeholder: event.placeholder,
        }
    }

    /// Single-line text form of the card
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{} {} {:<8} {}",
            self.day_number, self.month_label, self.day_name, self.title
        );
        for part in [&self.schedule, &self.location, &self.link, &self.description] {
            if !part.is_empty() {
                line.push_str(" | ");
                line.push_str(part);
            }
        }
        line
    }
}

/// `08:00 - 09:30`, `08:00` when there is no end, empty without a start
pub fn schedule_text(start: &str, end: &str) -> String {
    let start = start.trim();
    let end = end.trim();
    match (start.is_empty(), end.is_empty()) {
        (true, _) => String::new(),
        (false, true) => start.to_string(),
        (false, false) => format!("{} - {}", start, end),
    }
}

pub fn last_updated_label(updated_at: &DateTime<Local>) -> String {
    format!("Atualizado em: {}", format_clock(updated_at))
}

/// Renderer that writes the week through the log
#[derive(Debug, Default)]
pub struct LogRenderer;

impl LogRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderingAdapter for LogRenderer {
    fn render(&self, snapshot: &WeekSnapshot) -> PortalResult<()> {
        let today = snapshot.updated_at.date_naive();

        info!(
            "Semana atualizada ({} com eventos)",
            snapshot.real_event_count()
        );
        for event in &snapshot.events {
            info!("{}", EventCard::build(event, today).to_line());
        }
        info!("{}", last_updated_label(&snapshot.updated_at));

        let event_dates = snapshot
            .events
            .iter()
            .filter(|e| !e.placeholder)
            .filter_map(|e| resolve_day(e.dia_semana, today))
            .map(|resolved| resolved.date);
        let month = MonthView::containing(today, today).with_event_dates(event_dates);
        debug!("\n{}", month.render_text());

        Ok(())
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            debug!("Atualizando...");
        }
    }
}
