//! Queue interchange format
//!
//! Hosts that cannot hold live closures (the mobile shells) receive the
//! queue as JSON: an array of buckets, each an array of flat event records.
//! Node handles are flattened to coordinates and a callable is reduced to
//! its function-type name under `type`.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::event::{
    AnimationEvent, Callable, Coins, CrashContext, EventKind, Performance, Popup, PopupKind,
    TurnDirection, VanAction, VanActionKind, VanMove, WinScore,
};
use crate::map::{Coordinate, LightColour, NodeId, RoadMap};
use crate::queue::AnimationQueue;
use crate::scheduler::Scheduler;
use crate::sound::{SoundBoard, SoundEffect};

const CALLABLE_TAG: &str = "callable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateRecord {
    pub coordinate: Coordinate,
}

/// A node with its neighbours cut down to bare coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub coordinate: Coordinate,
    #[serde(default)]
    pub connected_nodes: Vec<CoordinateRecord>,
}

impl NodeRecord {
    fn from_map(map: &RoadMap, id: NodeId) -> Result<Self, ExportError> {
        let node = map.node(id).ok_or(ExportError::DanglingNode(id))?;
        let connected_nodes = node
            .connected_nodes
            .iter()
            .map(|&n| {
                map.coordinate_of(n)
                    .map(|coordinate| CoordinateRecord { coordinate })
                    .ok_or(ExportError::DanglingNode(n))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            coordinate: node.coordinate,
            connected_nodes,
        })
    }
}

/// One exported event. Only the fields of its `type` are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // van and trafficlight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub van_action: Option<VanActionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_node: Option<NodeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_node: Option<NodeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_node: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_action: Option<VanActionKind>,
    #[serde(rename = "destinationID", skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<usize>,

    // popup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_type: Option<PopupKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_hint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_coins: Option<Coins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_length_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score_for_path_length: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instr_coins: Option<Coins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instr_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score_for_number_of_instructions: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_score_disabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<LightColour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl EventRecord {
    pub fn from_event(event: &AnimationEvent, map: &RoadMap) -> Result<Self, ExportError> {
        let mut record = EventRecord {
            kind: event.kind.tag().to_string(),
            animation_length: event.animation_length,
            description: event.description.clone(),
            ..Default::default()
        };

        match &event.kind {
            EventKind::Callable(callable) => {
                if let Some(name) = callable.function_type() {
                    record.kind = name.to_string();
                }
            }
            EventKind::Van(van) => {
                record.id = Some(van.id);
                record.van_action = Some(van.action.kind());
                record.fuel = van.fuel;
                match van.action {
                    VanAction::Crash(context) => {
                        record.previous_node = Some(NodeRecord::from_map(map, context.previous_node)?);
                        record.current_node = Some(NodeRecord::from_map(map, context.current_node)?);
                        record.start_node = Some(
                            map.coordinate_of(context.start_node)
                                .ok_or(ExportError::DanglingNode(context.start_node))?,
                        );
                        record.attempted_action = Some(context.attempted_action);
                    }
                    VanAction::Deliver { destination } => record.destination_id = Some(destination),
                    _ => {}
                }
            }
            EventKind::Popup(popup) => {
                record.popup_type = Some(popup.kind);
                record.popup_message = Some(popup.message.clone());
                record.popup_hint = Some(popup.hint);
                if let Some(score) = &popup.score {
                    record.route_coins = Some(score.route_coins);
                    record.path_length_score = Some(score.path_length_score);
                    record.max_score_for_path_length = Some(score.max_score_for_path_length);
                    record.instr_coins = Some(score.instr_coins);
                    record.instr_score = Some(score.instr_score);
                    record.max_score_for_number_of_instructions =
                        Some(score.max_score_for_number_of_instructions);
                    record.total_score = Some(score.total_score);
                    record.max_score = Some(score.max_score);
                    record.performance = Some(score.performance);
                    record.path_score_disabled = Some(score.path_score_disabled);
                }
            }
            EventKind::TrafficLight { id, colour } => {
                record.id = Some(*id);
                record.colour = Some(*colour);
            }
            EventKind::Console { text } => record.text = Some(text.clone()),
        }
        Ok(record)
    }

    /// Rebuild a live event. Node coordinates are resolved against `map`;
    /// sound callables are revived through `board`, any other named callable
    /// comes back as a no-op carrying its name.
    pub fn into_event(self, map: &RoadMap, board: SoundBoard) -> Result<AnimationEvent, ExportError> {
        let kind = match self.kind.as_str() {
            "van" => EventKind::Van(self.van_move(map)?),
            "popup" => EventKind::Popup(self.popup()?),
            "trafficlight" => EventKind::TrafficLight {
                id: self.require(self.id, "id")?,
                colour: self.require(self.colour, "colour")?,
            },
            "console" => EventKind::Console {
                text: self.require(self.text.clone(), "text")?,
            },
            CALLABLE_TAG => EventKind::Callable(Callable::new(|_| {})),
            name => match SoundEffect::from_function_type(name) {
                Some(effect) => board.event(effect).kind,
                None => {
                    tracing::debug!("Imported unknown callable '{}' as a no-op", name);
                    EventKind::Callable(Callable::named(name, |_| {}))
                }
            },
        };
        Ok(AnimationEvent {
            kind,
            animation_length: self.animation_length,
            description: self.description,
        })
    }

    fn require<T>(&self, value: Option<T>, field: &'static str) -> Result<T, ExportError> {
        value.ok_or_else(|| ExportError::MissingField {
            kind: self.kind.clone(),
            field,
        })
    }

    fn van_move(&self, map: &RoadMap) -> Result<VanMove, ExportError> {
        let resolve = |coordinate: Coordinate| {
            map.node_at(coordinate).ok_or(ExportError::UnknownNode(coordinate))
        };

        let action = match self.require(self.van_action, "vanAction")? {
            VanActionKind::Forward => VanAction::Forward,
            VanActionKind::TurnLeft => VanAction::TurnLeft,
            VanActionKind::TurnRight => VanAction::TurnRight,
            VanActionKind::TurnAroundForward => VanAction::TurnAround(TurnDirection::Forward),
            VanActionKind::TurnAroundRight => VanAction::TurnAround(TurnDirection::Right),
            VanActionKind::TurnAroundLeft => VanAction::TurnAround(TurnDirection::Left),
            VanActionKind::Wait => VanAction::Wait,
            VanActionKind::Observe => VanAction::Observe,
            VanActionKind::Deliver => VanAction::Deliver {
                destination: self.require(self.destination_id, "destinationID")?,
            },
            VanActionKind::Crash => {
                let previous = self.require(self.previous_node.as_ref(), "previousNode")?;
                let current = self.require(self.current_node.as_ref(), "currentNode")?;
                VanAction::Crash(CrashContext {
                    previous_node: resolve(previous.coordinate)?,
                    current_node: resolve(current.coordinate)?,
                    start_node: resolve(self.require(self.start_node, "startNode")?)?,
                    attempted_action: self.require(self.attempted_action, "attemptedAction")?,
                })
            }
        };

        Ok(VanMove {
            id: self.require(self.id, "id")?,
            action,
            fuel: self.fuel,
        })
    }

    fn popup(&self) -> Result<Popup, ExportError> {
        let score = match self.total_score {
            Some(total_score) => Some(WinScore {
                route_coins: self.route_coins.unwrap_or_default(),
                path_length_score: self.path_length_score.unwrap_or(0.0),
                max_score_for_path_length: self.max_score_for_path_length.unwrap_or(0.0),
                instr_coins: self.instr_coins.unwrap_or_default(),
                instr_score: self.instr_score.unwrap_or(0.0),
                max_score_for_number_of_instructions: self
                    .max_score_for_number_of_instructions
                    .unwrap_or(0.0),
                total_score,
                max_score: self.max_score.unwrap_or(0.0),
                performance: self.require(self.performance, "performance")?,
                path_score_disabled: self.path_score_disabled.unwrap_or(false),
            }),
            None => None,
        };

        Ok(Popup {
            kind: self.require(self.popup_type, "popupType")?,
            message: self.popup_message.clone().unwrap_or_default(),
            hint: self.popup_hint.unwrap_or(false),
            score,
        })
    }
}

/// Something that fills a fresh queue, e.g. a compiled program run
pub trait Producer {
    fn produce(&mut self, queue: &mut AnimationQueue) -> Result<(), ExportError>;
}

impl<F> Producer for F
where
    F: FnMut(&mut AnimationQueue) -> Result<(), ExportError>,
{
    fn produce(&mut self, queue: &mut AnimationQueue) -> Result<(), ExportError> {
        self(queue)
    }
}

pub fn to_records(queue: &AnimationQueue, map: &RoadMap) -> Result<Vec<Vec<EventRecord>>, ExportError> {
    queue
        .buckets()
        .iter()
        .map(|bucket| {
            bucket
                .iter()
                .map(|event| EventRecord::from_event(event, map))
                .collect()
        })
        .collect()
}

pub fn serialize_queue(queue: &AnimationQueue, map: &RoadMap) -> Result<String, ExportError> {
    let records = to_records(queue, map)?;
    Ok(serde_json::to_string(&records)?)
}

/// Run a producer against an empty queue and serialise what it produced
pub fn export_program<P: Producer + ?Sized>(
    producer: &mut P,
    map: &RoadMap,
) -> Result<String, ExportError> {
    let mut queue = AnimationQueue::new();
    producer.produce(&mut queue)?;
    tracing::info!(
        "Exporting {} events over {} timestamps",
        queue.event_count(),
        queue.len()
    );
    serialize_queue(&queue, map)
}

/// Parse an exported queue back into live events
pub fn import_queue(json: &str, map: &RoadMap, board: SoundBoard) -> Result<AnimationQueue, ExportError> {
    let records: Vec<Vec<EventRecord>> = serde_json::from_str(json)?;
    let mut queue = AnimationQueue::new();
    for (i, bucket) in records.into_iter().enumerate() {
        if i > 0 {
            queue.start_new_timestamp();
        }
        for record in bucket {
            queue.append(record.into_event(map, board)?);
        }
    }
    tracing::debug!("Imported {} timestamps", queue.len());
    Ok(queue)
}

impl Scheduler {
    /// Serialise the scheduler's current queue
    pub fn export_queue(&self, map: &RoadMap) -> Result<String, ExportError> {
        let queue = self.queue().ok_or(crate::error::SchedulerError::NotReset)?;
        serialize_queue(queue, map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    use crate::dispatch::EventDispatcher;
    use crate::error::SchedulerError;
    use crate::testing::Recorder;

    /// Four nodes in a ring, so every node reaches itself again
    fn ring() -> RoadMap {
        let mut map = RoadMap::from_coordinates(&[
            Coordinate::new(0, 0),
            Coordinate::new(1, 0),
            Coordinate::new(1, 1),
            Coordinate::new(0, 1),
        ]);
        map.connect(NodeId(0), NodeId(1));
        map.connect(NodeId(1), NodeId(2));
        map.connect(NodeId(2), NodeId(3));
        map.connect(NodeId(3), NodeId(0));
        map
    }

    fn crash() -> AnimationEvent {
        AnimationEvent::crash(
            0,
            CrashContext {
                previous_node: NodeId(1),
                current_node: NodeId(2),
                start_node: NodeId(0),
                attempted_action: VanActionKind::Forward,
            },
        )
    }

    fn score() -> WinScore {
        WinScore {
            route_coins: Coins { whole: 2, half: 1, zero: 0 },
            path_length_score: 8.5,
            max_score_for_path_length: 10.0,
            instr_coins: Coins { whole: 3, half: 0, zero: 0 },
            instr_score: 10.0,
            max_score_for_number_of_instructions: 10.0,
            total_score: 18.5,
            max_score: 20.0,
            performance: Performance::ScoreGood,
            path_score_disabled: false,
        }
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn crash_nodes_flatten_to_coordinates() {
        let map = ring();
        let mut queue = AnimationQueue::new();
        queue.start_new_timestamp();
        queue.append(crash());

        let value = parse(&serialize_queue(&queue, &map).unwrap());
        let record = &value[1][0];
        assert_eq!(value[0], json!([]));
        assert_eq!(record["type"], "van");
        assert_eq!(record["vanAction"], "CRASH");
        assert_eq!(record["attemptedAction"], "FORWARD");
        assert_eq!(
            record["previousNode"],
            json!({
                "coordinate": {"x": 1, "y": 0},
                "connectedNodes": [
                    {"coordinate": {"x": 0, "y": 0}},
                    {"coordinate": {"x": 1, "y": 1}}
                ]
            })
        );
        assert_eq!(
            record["currentNode"]["connectedNodes"][1],
            json!({"coordinate": {"x": 0, "y": 1}})
        );
        assert_eq!(record["startNode"], json!({"x": 0, "y": 0}));
        // neighbours are leaves: no further nesting
        assert!(record["previousNode"]["connectedNodes"][0]
            .get("connectedNodes")
            .is_none());
    }

    #[test]
    fn callables_export_their_function_type() {
        let map = ring();
        let mut queue = AnimationQueue::new();
        queue.append(SoundBoard::new(true).event(SoundEffect::Win));
        queue.append(AnimationEvent::callable(Callable::new(|_| {})).with_length(200));

        let value = parse(&serialize_queue(&queue, &map).unwrap());
        assert_eq!(value[0][0], json!({"type": "sound.win"}));
        assert_eq!(value[0][1], json!({"type": "callable", "animationLength": 200}));
        assert!(value[0][0].get("functionType").is_none());
    }

    #[test]
    fn plain_events_keep_their_fields() {
        let map = ring();
        let mut queue = AnimationQueue::new();
        queue.append(AnimationEvent::deliver(1, 4).with_fuel(75.0));
        queue.append(AnimationEvent::traffic_light(2, LightColour::Green));
        queue.append(AnimationEvent::console("hello").with_description("print"));

        let value = parse(&serialize_queue(&queue, &map).unwrap());
        assert_eq!(
            value[0][0],
            json!({"type": "van", "id": 1, "vanAction": "DELIVER", "fuel": 75.0, "destinationID": 4})
        );
        assert_eq!(value[0][1], json!({"type": "trafficlight", "id": 2, "colour": "GREEN"}));
        assert_eq!(
            value[0][2],
            json!({"type": "console", "description": "print", "text": "hello"})
        );
    }

    #[test]
    fn win_popup_exports_score() {
        let map = ring();
        let mut queue = AnimationQueue::new();
        queue.append(AnimationEvent::win("Well done", score()));

        let value = parse(&serialize_queue(&queue, &map).unwrap());
        let record = &value[0][0];
        assert_eq!(record["popupType"], "WIN");
        assert_eq!(record["popupMessage"], "Well done");
        assert_eq!(record["popupHint"], false);
        assert_eq!(record["routeCoins"], json!({"whole": 2, "half": 1, "zero": 0}));
        assert_eq!(record["performance"], "scoreGood");
        assert_eq!(record["maxScoreForNumberOfInstructions"], 10.0);
    }

    #[test]
    fn dangling_node_is_reported() {
        let map = ring();
        let mut queue = AnimationQueue::new();
        queue.append(AnimationEvent::crash(
            0,
            CrashContext {
                previous_node: NodeId(9),
                current_node: NodeId(0),
                start_node: NodeId(0),
                attempted_action: VanActionKind::Wait,
            },
        ));
        assert!(matches!(
            serialize_queue(&queue, &map),
            Err(ExportError::DanglingNode(NodeId(9)))
        ));
    }

    #[test]
    fn export_program_runs_the_producer() {
        let map = ring();
        let mut producer = |queue: &mut AnimationQueue| {
            queue.start_new_timestamp();
            queue.append(AnimationEvent::forward(0));
            queue.start_new_timestamp();
            queue.append(AnimationEvent::popup(PopupKind::Fail, "Out of fuel"));
            Ok::<(), ExportError>(())
        };
        let value = parse(&export_program(&mut producer, &map).unwrap());
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[1][0]["vanAction"], "FORWARD");
        assert_eq!(value[2][0]["popupType"], "FAIL");

        let mut failing = |_: &mut AnimationQueue| -> Result<(), ExportError> {
            Err(ExportError::Producer("program did not compile".into()))
        };
        assert!(matches!(
            export_program(&mut failing, &map),
            Err(ExportError::Producer(_))
        ));
    }

    #[test]
    fn import_restores_live_events() {
        let map = ring();
        let board = SoundBoard::new(true);
        let mut queue = AnimationQueue::new();
        queue.append(board.event(SoundEffect::StartEngine));
        queue.start_new_timestamp();
        queue.append(crash());
        queue.append(AnimationEvent::turn_around(1, TurnDirection::Right).with_length(100));
        queue.start_new_timestamp();
        queue.append(AnimationEvent::win("Well done", score()).with_hint());

        let json = serialize_queue(&queue, &map).unwrap();
        let mut imported = import_queue(&json, &map, board).unwrap();
        assert_eq!(imported.len(), 3);
        assert_eq!(imported.event_count(), 4);

        let bucket = imported.bucket(1).unwrap();
        match &bucket[0].kind {
            EventKind::Van(VanMove { action: VanAction::Crash(context), .. }) => {
                assert_eq!(context.previous_node, NodeId(1));
                assert_eq!(context.current_node, NodeId(2));
                assert_eq!(context.start_node, NodeId(0));
                assert_eq!(context.attempted_action, VanActionKind::Forward);
            }
            other => panic!("expected a crash, got {:?}", other),
        }
        assert_eq!(bucket[1].animation_length, Some(100));

        match &imported.bucket(2).unwrap()[0].kind {
            EventKind::Popup(popup) => {
                assert!(popup.hint);
                assert_eq!(popup.score, Some(score()));
            }
            other => panic!("expected a popup, got {:?}", other),
        }

        // the revived sound callable still plays
        let mut stage = Recorder::default();
        let dispatcher = EventDispatcher::default();
        for event in imported.take_bucket(0).unwrap() {
            dispatcher.dispatch(event, &mut stage);
        }
        assert_eq!(stage.calls, vec!["play moving"]);

        // and exports the same way again
        assert_eq!(parse(&serialize_queue(&imported, &map).unwrap())[1], parse(&json)[1]);
    }

    #[test]
    fn unknown_callables_become_named_no_ops() {
        let map = ring();
        let json = r#"[[{"type": "highlightBlock"}, {"type": "callable"}]]"#;
        let queue = import_queue(json, &map, SoundBoard::new(false)).unwrap();
        let bucket = queue.bucket(0).unwrap();
        match (&bucket[0].kind, &bucket[1].kind) {
            (EventKind::Callable(named), EventKind::Callable(plain)) => {
                assert_eq!(named.function_type(), Some("highlightBlock"));
                assert_eq!(plain.function_type(), None);
            }
            other => panic!("expected callables, got {:?}", other),
        }
    }

    #[test]
    fn import_rejects_bad_input() {
        let map = ring();
        let board = SoundBoard::new(true);

        assert!(matches!(
            import_queue("[[{", &map, board),
            Err(ExportError::Json(_))
        ));
        assert!(matches!(
            import_queue(r#"[[{"type": "van", "id": 0}]]"#, &map, board),
            Err(ExportError::MissingField { field: "vanAction", .. })
        ));
        assert!(matches!(
            import_queue(r#"[[{"type": "console"}]]"#, &map, board),
            Err(ExportError::MissingField { field: "text", .. })
        ));

        let off_map = r#"[[{
            "type": "van", "id": 0, "vanAction": "CRASH", "attemptedAction": "FORWARD",
            "previousNode": {"coordinate": {"x": 7, "y": 7}},
            "currentNode": {"coordinate": {"x": 0, "y": 0}},
            "startNode": {"x": 0, "y": 0}
        }]]"#;
        assert!(matches!(
            import_queue(off_map, &map, board),
            Err(ExportError::UnknownNode(Coordinate { x: 7, y: 7 }))
        ));
    }

    #[test]
    fn scheduler_export_requires_reset() {
        let map = ring();
        let scheduler = Scheduler::new(EventDispatcher::default(), 1);
        assert!(matches!(
            scheduler.export_queue(&map),
            Err(ExportError::Scheduler(SchedulerError::NotReset))
        ));
    }
}
