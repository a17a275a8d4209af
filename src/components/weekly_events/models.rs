use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Values of `visivel` that hide an event (compared trimmed and lowercased)
const HIDDEN_FLAGS: [&str; 6] = ["0", "false", "nao", "não", "n", "off"];

pub const PLACEHOLDER_TITLE: &str = "Sem eventos";
pub const PLACEHOLDER_DESCRIPTION: &str = "Nenhum evento cadastrado para este dia.";

/// Weekday as identified by the feed's `dia_semana` code (1 = Domingo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, IntoStaticStr)]
pub enum WeekDay {
    Domingo = 1,
    Segunda = 2,
    Terca = 3,
    Quarta = 4,
    Quinta = 5,
    Sexta = 6,
    Sabado = 7,
}

impl WeekDay {
    pub fn from_code(code: u8) -> Option<Self> {
        WeekDay::iter().find(|day| day.code() == code)
    }

    /// Only integral values in 1..=7 name a day
    pub fn from_number(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || !(1.0..=7.0).contains(&value) {
            return None;
        }
        Self::from_code(value as u8)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Days after Sunday (0 = Sunday .. 6 = Saturday)
    pub fn days_from_sunday(self) -> u32 {
        u32::from(self.code()) - 1
    }

    /// All seven days in code order
    pub fn all() -> [WeekDay; 7] {
        [
            WeekDay::Domingo,
            WeekDay::Segunda,
            WeekDay::Terca,
            WeekDay::Quarta,
            WeekDay::Quinta,
            WeekDay::Sexta,
            WeekDay::Sabado,
        ]
    }
}

/// Event as published by the spreadsheet feed.
///
/// The feed is loosely validated, so text fields accept strings or numbers
/// and fall back to an empty string for anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub id: String,
    /// Day code coerced to a number; `None` when it cannot be read as one
    #[serde(default, deserialize_with = "deserialize_day_number")]
    pub dia_semana: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub titulo: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub descricao: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub local: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub link: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub hora_inicio: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub hora_fim: String,
    #[serde(default)]
    pub visivel: Option<Value>,
}

impl RawEvent {
    /// Recognized weekday, if the day code is one of 1..=7
    pub fn week_day(&self) -> Option<WeekDay> {
        self.dia_semana.and_then(WeekDay::from_number)
    }

    /// Absent, empty or truthy flags are visible; known "no" spellings hide the event
    pub fn is_visible(&self) -> bool {
        match &self.visivel {
            None | Some(Value::Null) => true,
            Some(Value::Bool(visible)) => *visible,
            Some(value) => {
                let text = value_to_text(value).trim().to_lowercase();
                text.is_empty() || !HIDDEN_FLAGS.contains(&text.as_str())
            }
        }
    }
}

/// One slot of the rendered week: a real event or a placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEvent {
    pub id: String,
    pub dia_semana: u8,
    pub titulo: String,
    pub descricao: String,
    pub local: String,
    pub link: String,
    pub hora_inicio: String,
    pub hora_fim: String,
    #[serde(rename = "_isPlaceholder")]
    pub placeholder: bool,
}

impl NormalizedEvent {
    pub fn placeholder(day: WeekDay) -> Self {
        Self {
            id: format!("sem-eventos-{}", day.code()),
            dia_semana: day.code(),
            titulo: PLACEHOLDER_TITLE.to_string(),
            descricao: PLACEHOLDER_DESCRIPTION.to_string(),
            local: String::new(),
            link: String::new(),
            hora_inicio: String::new(),
            hora_fim: String::new(),
            placeholder: true,
        }
    }

    /// Real event pinned to the slot of `day`
    pub fn from_raw(raw: &RawEvent, day: WeekDay) -> Self {
        Self {
            id: raw.id.clone(),
            dia_semana: day.code(),
            titulo: raw.titulo.clone(),
            descricao: raw.descricao.clone(),
            local: raw.local.clone(),
            link: raw.link.clone(),
            hora_inicio: raw.hora_inicio.clone(),
            hora_fim: raw.hora_fim.clone(),
            placeholder: false,
        }
    }

    pub fn week_day(&self) -> Option<WeekDay> {
        WeekDay::from_code(self.dia_semana)
    }
}

/// The week handed to a rendering adapter after a successful refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSnapshot {
    pub events: [NormalizedEvent; 7],
    pub updated_at: DateTime<Local>,
}

impl WeekSnapshot {
    pub fn new(events: [NormalizedEvent; 7], updated_at: DateTime<Local>) -> Self {
        Self { events, updated_at }
    }

    /// Number of slots holding a real event
    pub fn real_event_count(&self) -> usize {
        self.events.iter().filter(|e| !e.placeholder).count()
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn deserialize_text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn deserialize_day_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        _ => None,
    })
}
