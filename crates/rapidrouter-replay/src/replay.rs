//! Load a level and an exported queue, then play it back

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rapidrouter_animation::{
    import_queue, serialize_queue, AppConfig, Level, ManualTicks, Scheduler, SoundBoard, Stage,
    SystemTicks,
};

/// Wall-clock polling interval in realtime mode
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub timestamps: usize,
    pub events: usize,
    /// Playback time (virtual unless realtime)
    pub elapsed_ms: u64,
}

pub fn load_level(path: &Path) -> Result<Level> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read level {}", path.display()))?;
    let level: Level = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse level {}", path.display()))?;
    tracing::info!(
        "Level: {} nodes, {} destinations, {} traffic lights",
        level.map.nodes.len(),
        level.map.destinations.len(),
        level.traffic_lights.len()
    );
    Ok(level)
}

/// Import a queue and serialise it again
pub fn normalize(config: &AppConfig, level: &Level, queue_json: &str) -> Result<String> {
    let board = SoundBoard::from_config(config);
    let queue = import_queue(queue_json, &level.map, board).context("Invalid animation queue")?;
    Ok(serialize_queue(&queue, &level.map)?)
}

pub fn replay(
    config: &AppConfig,
    level: &Level,
    queue_json: &str,
    stage: &mut dyn Stage,
    realtime: bool,
) -> Result<Summary> {
    let board = SoundBoard::from_config(config);
    let queue = import_queue(queue_json, &level.map, board).context("Invalid animation queue")?;
    let summary = Summary {
        timestamps: queue.len(),
        events: queue.event_count(),
        elapsed_ms: 0,
    };

    let mut scheduler = Scheduler::from_config(config);
    scheduler.render_level(level, stage);
    scheduler.reset(level, stage);
    scheduler.replace_queue(queue)?;
    scheduler.play(stage);

    let elapsed_ms = if realtime {
        let started = Instant::now();
        let mut ticks = SystemTicks::new();
        while scheduler.is_animating() {
            std::thread::sleep(FRAME);
            scheduler.pump(&mut ticks, stage);
        }
        started.elapsed().as_millis() as u64
    } else {
        let mut ticks = ManualTicks::new();
        let mut virtual_ms = 0u64;
        while let Some(remaining) = scheduler.settle_remaining_ms() {
            ticks.advance(remaining);
            virtual_ms += u64::from(remaining);
            scheduler.pump(&mut ticks, stage);
        }
        virtual_ms
    };

    tracing::info!(
        "Replayed {} events over {} timestamps in {}ms",
        summary.events,
        summary.timestamps,
        elapsed_ms
    );
    Ok(Summary {
        elapsed_ms,
        ..summary
    })
}
