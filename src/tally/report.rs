// Table export and chart rendering for the aggregated results.

use std::collections::HashMap;

use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::tally::*;

const CHART_SIZE: (u32, u32) = (1200, 600);

// Bar colors when a candidate spec does not carry one.
const FALLBACK_COLORS: [RGBColor; 4] = [RED, BLUE, GREEN, MAGENTA];

/// Assembles the exported rows: one per state with data for at least one
/// candidate, in configured state order. The join on the state id is an
/// outer one, a candidate without an entry gets a blank cell.
pub fn table_rows(
    states: &[String],
    candidates: &[CandidateSpec],
    table: &HashMap<String, HashMap<String, u32>>,
) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for state in states.iter() {
        let values: Vec<Option<u32>> = candidates
            .iter()
            .map(|c| {
                table
                    .get(&c.candidate_id)
                    .and_then(|per_state| per_state.get(state))
                    .cloned()
            })
            .collect();
        if values.iter().all(|v| v.is_none()) {
            continue;
        }
        let mut row: Vec<String> = vec![state.clone()];
        for v in values {
            row.push(v.map(|x| x.to_string()).unwrap_or_default());
        }
        rows.push(row);
    }
    rows
}

pub fn table_header(candidates: &[CandidateSpec]) -> Vec<String> {
    let mut header: Vec<String> = vec!["State".to_string()];
    for c in candidates.iter() {
        header.push(format!("{} Votes", c.label()));
    }
    header
}

pub fn write_table(
    path: &str,
    candidates: &[CandidateSpec],
    rows: &[Vec<String>],
) -> BTallyResult<()> {
    let header = table_header(candidates);

    let mut wtr = csv::Writer::from_path(path).context(CsvOpenSnafu { path })?;
    wtr.write_record(&header).context(CsvWriteSnafu {})?;
    for row in rows.iter() {
        wtr.write_record(row).context(CsvWriteSnafu {})?;
    }
    wtr.flush().context(CsvFlushSnafu {})?;
    info!("Wrote {} table rows to {:?}", rows.len(), path);
    Ok(())
}

fn states_with_data(
    states: &[String],
    candidates: &[CandidateSpec],
    table: &HashMap<String, HashMap<String, u32>>,
) -> Vec<String> {
    states
        .iter()
        .filter(|state| {
            candidates.iter().any(|c| {
                table
                    .get(&c.candidate_id)
                    .map(|per_state| per_state.contains_key(state.as_str()))
                    .unwrap_or(false)
            })
        })
        .cloned()
        .collect()
}

pub fn parse_color(spec: Option<&str>, fallback: RGBColor) -> RGBColor {
    match spec {
        Some("red") => RED,
        Some("blue") => BLUE,
        Some("green") => GREEN,
        Some("yellow") => YELLOW,
        Some("magenta") => MAGENTA,
        Some("cyan") => CYAN,
        Some("black") => BLACK,
        Some(s) if s.len() == 7 && s.starts_with('#') => {
            let channel = |r: std::ops::Range<usize>| u8::from_str_radix(&s[r], 16).ok();
            match (channel(1..3), channel(3..5), channel(5..7)) {
                (Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
                _ => fallback,
            }
        }
        _ => fallback,
    }
}

/// Renders the grouped bar chart: one group per state with data, one bar per
/// candidate within the group, all on a shared category axis.
pub fn render_chart(
    path: &str,
    title: &str,
    candidates: &[CandidateSpec],
    states: &[String],
    table: &HashMap<String, HashMap<String, u32>>,
) -> BTallyResult<()> {
    let chart_states = states_with_data(states, candidates, table);
    if chart_states.is_empty() {
        info!("render_chart: no state has any data, skipping the chart");
        return Ok(());
    }

    let err = |message: String| {
        Box::new(TallyError::Chart {
            path: path.to_string(),
            message,
        })
    };

    let max_votes: u32 = table
        .values()
        .flat_map(|per_state| per_state.values())
        .max()
        .cloned()
        .unwrap_or(0);
    let y_max = (max_votes as f64 * 1.2).max(10.0);
    let n = chart_states.len();

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| err(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(130)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)
        .map_err(|e| err(e.to_string()))?;

    let labels = chart_states.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x: &f64| {
            let idx = x.round();
            if idx >= 0.0 && (idx as usize) < labels.len() && (x - idx).abs() < 0.3 {
                labels[idx as usize].clone()
            } else {
                String::new()
            }
        })
        .x_label_style(
            ("sans-serif", 11)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_desc("Electoral votes")
        .draw()
        .map_err(|e| err(e.to_string()))?;

    // One slot per state, split evenly between the candidates.
    let slot = 0.8 / candidates.len() as f64;
    for (ci, cand) in candidates.iter().enumerate() {
        let color = parse_color(
            cand.color.as_deref(),
            FALLBACK_COLORS[ci % FALLBACK_COLORS.len()],
        );
        let per_state = table.get(&cand.candidate_id);
        let bars: Vec<Rectangle<(f64, f64)>> = chart_states
            .iter()
            .enumerate()
            .filter_map(|(i, state)| {
                per_state
                    .and_then(|m| m.get(state))
                    .map(|votes| {
                        let x0 = i as f64 - 0.4 + ci as f64 * slot;
                        Rectangle::new([(x0, 0.0), (x0 + slot, *votes as f64)], color.filled())
                    })
            })
            .collect();
        chart
            .draw_series(bars)
            .map_err(|e| err(e.to_string()))?
            .label(cand.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(|e| err(e.to_string()))?;
    root.present().map_err(|e| err(e.to_string()))?;
    info!("Wrote chart to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_parse_by_name_and_hex() {
        assert_eq!(parse_color(Some("red"), BLACK), RED);
        assert_eq!(parse_color(Some("#102030"), BLACK), RGBColor(16, 32, 48));
        assert_eq!(parse_color(Some("chartreuse"), BLACK), BLACK);
        assert_eq!(parse_color(None, BLUE), BLUE);
    }
}
