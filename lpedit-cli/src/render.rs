use lpedit_core::PodSnapshot;
use lpedit_types::{Parameter, Preset};

pub fn parameter_line(p: &Parameter) -> String {
    if p.is_enumerated() {
        format!("  [{}] {} = {}  ({})", p.id, p.name, p.value, p.allowed_value.join("|"))
    } else {
        format!("  [{}] {} = {}  ({}..{})", p.id, p.name, p.value, p.min, p.max)
    }
}

pub fn preset_listing(presets: &[Preset], active: Option<&Preset>) -> Vec<String> {
    presets
        .iter()
        .map(|preset| {
            let marker = match active {
                Some(a) if a.id == preset.id && a.set_id == preset.set_id => '*',
                _ => ' ',
            };
            format!("{} {:>3} {}", marker, preset.id.get(), preset.name)
        })
        .collect()
}

pub fn show(snapshot: &PodSnapshot) -> Vec<String> {
    let mut lines = vec![snapshot.summary()];
    if let Some(preset) = &snapshot.current_preset {
        lines.push(format!(
            "{} ({} active stage(s))",
            preset.name,
            preset.active_stage_count()
        ));
        lines.extend(preset.parameters.iter().map(parameter_line));
    }
    lines
}
