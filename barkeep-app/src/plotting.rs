//! Charts drawn from a session log.

use anyhow::{Context, Result};
use barkeep_core::{
    analysis::{self, SessionFrame},
    simulation::state::SimulationEvent,
};
use plotters::prelude::*;
use std::path::Path;

const PALETTE: [RGBColor; 6] = [RED, GREEN, BLUE, MAGENTA, CYAN, BLACK];

/// Reads the CSV session log at `log_path` and saves every chart into `output_dir`.
pub fn generate_all_plots(output_dir: &str, log_path: &str) -> Result<()> {
    println!("[Plotting] Generating graphs from session data...");

    let frames = analysis::read_session_log(log_path)
        .with_context(|| format!("Failed to read session log {}", log_path))?;

    if frames.is_empty() {
        println!("[Plotting] Warning: No data to plot.");
        return Ok(());
    }

    let container_ids: Vec<String> = frames
        .last()
        .map(|f| f.containers.keys().cloned().collect())
        .unwrap_or_default();

    plot_container_volumes(output_dir, &frames, &container_ids)?;
    plot_container_temperatures(output_dir, &frames, &container_ids)?;
    plot_activity_timeline(output_dir, &frames)?;

    println!("[Plotting] Graphs have been saved to '{}'.", output_dir);
    Ok(())
}

fn chart_path(output_dir: &str, file_name: &str) -> String {
    Path::new(output_dir).join(file_name).to_string_lossy().into_owned()
}

/// Line chart of each container's liquid volume over time.
fn plot_container_volumes(
    output_dir: &str,
    frames: &[SessionFrame],
    container_ids: &[String],
) -> Result<()> {
    let path = chart_path(output_dir, "1_container_volumes.png");
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = frames.last().map_or(1.0, |f| f.elapsed_s).max(f64::EPSILON);
    let max_volume = frames
        .iter()
        .flat_map(|f| f.containers.values().map(|c| c.volume_ml))
        .fold(0.0, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Container Volume Over Time", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..max_time, 0f64..max_volume * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Volume (ml)")
        .draw()?;

    for (i, id) in container_ids.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                frames.iter().map(|f| {
                    (
                        f.elapsed_s,
                        f.containers.get(id).map_or(0.0, |c| c.volume_ml),
                    )
                }),
                color.stroke_width(2),
            ))?
            .label(id.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Line chart of each container's temperature, with the ice volume dashed.
fn plot_container_temperatures(
    output_dir: &str,
    frames: &[SessionFrame],
    container_ids: &[String],
) -> Result<()> {
    let path = chart_path(output_dir, "2_container_temperatures.png");
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = frames.last().map_or(1.0, |f| f.elapsed_s).max(f64::EPSILON);
    let (min_temp, max_temp) = frames
        .iter()
        .flat_map(|f| f.containers.values().map(|c| c.temperature_c))
        .fold((0.0f64, 30.0f64), |(lo, hi), t| (lo.min(t), hi.max(t)));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Temperature and Ice Over Time",
            ("sans-serif", 50).into_font(),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..max_time, (min_temp - 2.0)..(max_temp + 2.0))?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Temperature (°C) / Ice (ml)")
        .draw()?;

    for (i, id) in container_ids.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                frames.iter().filter_map(|f| {
                    f.containers
                        .get(id)
                        .filter(|c| c.volume_ml > 0.0)
                        .map(|c| (f.elapsed_s, c.temperature_c))
                }),
                color.stroke_width(2),
            ))?
            .label(format!("{} (°C)", id))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));

        if frames
            .iter()
            .any(|f| f.containers.get(id).map_or(false, |c| c.ice_ml > 0.0))
        {
            let ice = frames.iter().map(|f| {
                (
                    f.elapsed_s,
                    f.containers.get(id).map_or(0.0, |c| c.ice_ml.min(max_temp + 2.0)),
                )
            });
            chart
                .draw_series(DashedLineSeries::new(ice, 5, 5, color.stroke_width(1)))?
                .label(format!("{} ice (ml)", id))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Timeline of ticks with pour, shake and serve activity.
fn plot_activity_timeline(output_dir: &str, frames: &[SessionFrame]) -> Result<()> {
    let path = chart_path(output_dir, "3_activity_timeline.png");
    let root = BitMapBackend::new(&path, (1024, 256)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_tick = frames.last().map_or(1, |f| f.tick).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Bar Activity", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(20)
        .build_cartesian_2d(0u64..max_tick + 1, 0..4i32)?;

    chart
        .configure_mesh()
        .x_desc("Tick")
        .disable_y_axis()
        .draw()?;

    let ticks_with = |pred: fn(&SimulationEvent) -> bool| -> Vec<u64> {
        frames
            .iter()
            .filter(|f| f.events.iter().any(pred))
            .map(|f| f.tick)
            .collect()
    };

    let pours = ticks_with(|e| matches!(e, SimulationEvent::PourTick { .. }));
    let shakes = ticks_with(|e| {
        matches!(
            e,
            SimulationEvent::ShakeStarted { .. } | SimulationEvent::ShakeComplete { .. }
        )
    });
    let serves = ticks_with(|e| matches!(e, SimulationEvent::DrinkServed { .. }));

    for (ticks, height, color, label) in [
        (pours, 1, BLUE, "pour"),
        (shakes, 2, GREEN, "shake"),
        (serves, 3, RED, "serve"),
    ] {
        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .data(ticks.iter().map(move |tick| (*tick, height))),
            )?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
