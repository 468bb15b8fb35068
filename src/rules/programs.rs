use crate::models::{Program, ProgramSelection};

/// Repair the program selection in place. Returns whether anything changed.
///
/// At least one program is always enabled (kidney when the set is empty) and
/// the active program is always one of the enabled ones, picked in
/// `Program::ALL` order when it has to be reassigned. Idempotent.
pub fn ensure_active_program_consistent(selection: &mut ProgramSelection) -> bool {
    let mut changed = false;

    if selection.enabled.is_empty() {
        selection.enabled.insert(Program::Kidney);
        tracing::debug!("No program enabled, kidney force-enabled");
        changed = true;
    }

    if !selection.is_enabled(selection.active) {
        let previous = selection.active;
        selection.active = Program::ALL
            .iter()
            .copied()
            .find(|p| selection.is_enabled(*p))
            .unwrap_or(Program::Kidney);
        tracing::debug!(
            from = %previous,
            to = %selection.active,
            "Active program was not enabled, reassigned"
        );
        changed = true;
    }

    changed
}

/// Switch a program on or off, then repair the selection.
pub fn set_program_enabled(selection: &mut ProgramSelection, program: Program, enabled: bool) {
    if enabled {
        selection.enabled.insert(program);
    } else {
        selection.enabled.remove(&program);
    }
    ensure_active_program_consistent(selection);
}

/// Make `program` the active one, enabling it if needed.
pub fn set_active_program(selection: &mut ProgramSelection, program: Program) {
    selection.enabled.insert(program);
    selection.active = program;
    ensure_active_program_consistent(selection);
}
