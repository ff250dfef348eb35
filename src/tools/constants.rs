//! Physical constant lookup.

use serde_json::json;

struct Constant {
    value: f64,
    unit: &'static str,
    symbol: &'static str,
}

const CONSTANTS: &[(&str, Constant)] = &[
    (
        "speed of light",
        Constant {
            value: 299_792_458.0,
            unit: "m/s",
            symbol: "c",
        },
    ),
    (
        "gravitational constant",
        Constant {
            value: 6.67430e-11,
            unit: "N(m/kg)^2",
            symbol: "G",
        },
    ),
    (
        "planck constant",
        Constant {
            value: 6.62607015e-34,
            unit: "Js",
            symbol: "h",
        },
    ),
    (
        "boltzmann constant",
        Constant {
            value: 1.380649e-23,
            unit: "J/K",
            symbol: "k",
        },
    ),
    (
        "electron mass",
        Constant {
            value: 9.1093837015e-31,
            unit: "kg",
            symbol: "m_e",
        },
    ),
    (
        "proton mass",
        Constant {
            value: 1.67262192369e-27,
            unit: "kg",
            symbol: "m_p",
        },
    ),
    (
        "elementary charge",
        Constant {
            value: 1.602176634e-19,
            unit: "C",
            symbol: "e",
        },
    ),
];

/// Look up a physical constant by name.
///
/// The name is normalized (lowercase, trimmed, underscores to spaces)
/// before an exact-match lookup; a miss falls back to substring
/// containment against the table keys, so "light" and "Speed_of_Light"
/// both resolve. Returns a JSON string of `{value, unit, symbol}`, or a
/// structured `{"error": ...}` payload when nothing matches.
pub fn get_physics_constant(name: &str) -> String {
    let lowered = name.to_lowercase();
    let query = lowered.trim().replace('_', " ");

    if let Some((_, constant)) = CONSTANTS.iter().find(|(key, _)| *key == query) {
        return render(constant);
    }

    if let Some((_, constant)) = CONSTANTS.iter().find(|(key, _)| key.contains(&query)) {
        return render(constant);
    }

    json!({ "error": format!("Constant '{}' not found.", name) }).to_string()
}

fn render(constant: &Constant) -> String {
    json!({
        "value": constant.value,
        "unit": constant.unit,
        "symbol": constant.symbol,
    })
    .to_string()
}
