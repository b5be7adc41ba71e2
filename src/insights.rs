//! Static insights panel shown below the charts.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub key_insights: &'static [&'static str],
    pub sustainability_plan: &'static [&'static str],
    pub target: &'static str,
}

const KEY_INSIGHTS: &[&str] = &[
    "M Block labs and auditorium show higher energy demand due to equipment and events.",
    "Lower-floor labs consume steady power throughout the day.",
    "Solar contribution significantly reduces grid dependency.",
    "Old building blocks can benefit from energy-efficient retrofits.",
];

const SUSTAINABILITY_PLAN: &[&str] = &[
    "Rooftop solar expansion on M Block & Old Building",
    "Smart energy meters per floor",
    "AI-based HVAC scheduling",
    "Sensor-based lighting in washrooms and corridors",
];

pub fn insights() -> Insights {
    Insights {
        key_insights: KEY_INSIGHTS,
        sustainability_plan: SUSTAINABILITY_PLAN,
        target: "Net-zero energy campus by 2035",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insights_serialize_as_lists() {
        let json = serde_json::to_value(insights()).unwrap();
        assert_eq!(json["key_insights"].as_array().unwrap().len(), 4);
        assert_eq!(json["sustainability_plan"].as_array().unwrap().len(), 4);
        assert_eq!(json["target"], "Net-zero energy campus by 2035");
    }
}
