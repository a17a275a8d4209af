use super::models::{NormalizedEvent, RawEvent, WeekDay};
use crate::utils::time::parse_time_to_minutes;
use std::cmp::Ordering;

/// Sort position for events whose day code is missing or zero
const UNKNOWN_DAY_RANK: f64 = 99.0;

/// Reduce a raw feed into exactly one entry per weekday, in code order 1..=7.
///
/// Events are ordered by day, start time and id, hidden or unplaceable
/// events are dropped, and each day keeps its earliest event. Extra events
/// on the same day are counted in the kept event's description; days with
/// nothing to show get a placeholder.
pub fn normalize_week_events(raw_events: &[RawEvent]) -> [NormalizedEvent; 7] {
    let mut sorted: Vec<&RawEvent> = raw_events.iter().collect();
    // Vec::sort_by is stable, so full ties keep feed order
    sorted.sort_by(|a, b| compare_events(a, b));

    let mut buckets: [Vec<&RawEvent>; 7] = Default::default();
    for event in sorted {
        if !event.is_visible() {
            continue;
        }
        if let Some(day) = event.week_day() {
            buckets[day.days_from_sunday() as usize].push(event);
        }
    }

    let days = WeekDay::all();
    std::array::from_fn(|i| reduce_bucket(days[i], &buckets[i]))
}

fn reduce_bucket(day: WeekDay, bucket: &[&RawEvent]) -> NormalizedEvent {
    let Some(primary) = bucket.first() else {
        return NormalizedEvent::placeholder(day);
    };

    let mut event = NormalizedEvent::from_raw(primary, day);
    let extra = bucket.len() - 1;
    if extra > 0 {
        event.descricao = append_extra_count(&event.descricao, extra);
    }
    event
}

fn append_extra_count(description: &str, extra: usize) -> String {
    let suffix = if extra == 1 {
        "(+1 evento)".to_string()
    } else {
        format!("(+{} eventos)", extra)
    };

    let base = description.trim();
    if base.is_empty() {
        suffix
    } else {
        format!("{} {}", base, suffix)
    }
}

fn compare_events(a: &RawEvent, b: &RawEvent) -> Ordering {
    day_rank(a)
        .total_cmp(&day_rank(b))
        .then_with(|| start_rank(a).cmp(&start_rank(b)))
        .then_with(|| a.id.trim().cmp(b.id.trim()))
}

fn day_rank(event: &RawEvent) -> f64 {
    match event.dia_semana {
        Some(day) if day != 0.0 => day,
        _ => UNKNOWN_DAY_RANK,
    }
}

/// Minutes since midnight; unparsable or empty times sort last
fn start_rank(event: &RawEvent) -> u32 {
    parse_time_to_minutes(&event.hora_inicio).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::weekly_events::models::{PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE};
    use serde_json::{json, Value};

    fn events(value: Value) -> Vec<RawEvent> {
        serde_json::from_value(value).unwrap()
    }

    fn assert_week_shape(week: &[NormalizedEvent; 7]) {
        let codes: Vec<u8> = week.iter().map(|e| e.dia_semana).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test_log::test]
    fn empty_feed_gives_seven_placeholders() {
        let week = normalize_week_events(&[]);

        assert_week_shape(&week);
        for (i, event) in week.iter().enumerate() {
            assert!(event.placeholder);
            assert_eq!(event.id, format!("sem-eventos-{}", i + 1));
            assert_eq!(event.titulo, PLACEHOLDER_TITLE);
            assert_eq!(event.descricao, PLACEHOLDER_DESCRIPTION);
            assert_eq!(event.hora_inicio, "");
        }
    }

    #[test_log::test]
    fn earliest_event_wins_and_counts_the_rest() {
        let week = normalize_week_events(&events(json!([
            { "id": "a", "dia_semana": 2, "titulo": "Depois", "descricao": "Aula", "hora_inicio": "09:00" },
            { "id": "b", "dia_semana": 2, "titulo": "Antes", "descricao": "Aula", "hora_inicio": "08:00" },
        ])));

        let monday = &week[1];
        assert_eq!(monday.id, "b");
        assert_eq!(monday.titulo, "Antes");
        assert_eq!(monday.hora_inicio, "08:00");
        assert!(monday.descricao.ends_with("(+1 evento)"));
        assert_eq!(monday.descricao, "Aula (+1 evento)");
        assert!(!monday.placeholder);
    }

    #[test_log::test]
    fn plural_suffix_and_empty_description() {
        let week = normalize_week_events(&events(json!([
            { "id": "1", "dia_semana": 4, "descricao": "   " },
            { "id": "2", "dia_semana": 4 },
            { "id": "3", "dia_semana": 4 },
        ])));

        assert_eq!(week[3].id, "1");
        assert_eq!(week[3].descricao, "(+2 eventos)");
    }

    #[test_log::test]
    fn invalid_day_codes_are_dropped() {
        let week = normalize_week_events(&events(json!([
            { "id": "nine", "dia_semana": 9, "titulo": "Fora" },
            { "id": "zero", "dia_semana": 0, "titulo": "Fora" },
            { "id": "text", "dia_semana": "amanhã", "titulo": "Fora" },
            { "id": "frac", "dia_semana": 2.5, "titulo": "Fora" },
            { "id": "none", "titulo": "Fora" },
        ])));

        assert_week_shape(&week);
        assert!(week.iter().all(|e| e.placeholder));
        assert!(week.iter().all(|e| e.titulo != "Fora"));
    }

    #[test_log::test]
    fn hidden_events_are_excluded() {
        let week = normalize_week_events(&events(json!([
            { "id": "1", "dia_semana": 3, "titulo": "Oculto", "visivel": "nao" },
            { "id": "2", "dia_semana": 5, "titulo": "Visivel" },
            { "id": "3", "dia_semana": 5, "titulo": "Tambem oculto", "visivel": false },
        ])));

        assert!(week[2].placeholder);
        assert_eq!(week[4].titulo, "Visivel");
        // Hidden same-day events are not counted
        assert_eq!(week[4].descricao, "");
    }

    #[test_log::test]
    fn string_day_codes_are_pinned_to_their_slot() {
        let week = normalize_week_events(&events(json!([
            { "id": "1", "dia_semana": "7", "titulo": "Sabado" },
        ])));

        assert_eq!(week[6].titulo, "Sabado");
        assert_eq!(week[6].dia_semana, 7);
    }

    #[test_log::test]
    fn untimed_events_sort_after_timed_ones() {
        let week = normalize_week_events(&events(json!([
            { "id": "a", "dia_semana": 6, "titulo": "Sem horario" },
            { "id": "b", "dia_semana": 6, "titulo": "Horario invalido", "hora_inicio": "25:00" },
            { "id": "c", "dia_semana": 6, "titulo": "Tarde", "hora_inicio": "14:30" },
        ])));

        assert_eq!(week[5].titulo, "Tarde");
        assert_eq!(week[5].descricao, "(+2 eventos)");
    }

    #[test_log::test]
    fn id_breaks_time_ties() {
        let week = normalize_week_events(&events(json!([
            { "id": "b", "dia_semana": 1, "titulo": "B", "hora_inicio": "10:00" },
            { "id": "a", "dia_semana": 1, "titulo": "A", "hora_inicio": "10:00" },
        ])));

        assert_eq!(week[0].titulo, "A");
    }

    #[test_log::test]
    fn full_ties_keep_feed_order() {
        let week = normalize_week_events(&events(json!([
            { "id": "x", "dia_semana": 3, "titulo": "Primeiro", "hora_inicio": "10:00" },
            { "id": "x", "dia_semana": 3, "titulo": "Segundo", "hora_inicio": "10:00" },
        ])));

        assert_eq!(week[2].titulo, "Primeiro");
    }

    #[test_log::test]
    fn large_noisy_feed_keeps_the_week_shape() {
        let raw: Vec<RawEvent> = (0..50)
            .map(|i| RawEvent {
                id: i.to_string(),
                dia_semana: Some((i % 10) as f64),
                titulo: format!("Evento {}", i),
                hora_inicio: format!("{:02}:00", i % 30),
                ..Default::default()
            })
            .collect();

        let week = normalize_week_events(&raw);

        assert_week_shape(&week);
        assert!(week.iter().all(|e| !e.placeholder));
        assert_eq!(normalize_week_events(&raw), week);
    }
}
