//! Unit tests for uniform location bookkeeping
//!
//! Locations are plain integers here, no GL context required.

use super::*;

#[test]
fn test_intern_uniform_reuses_key_for_same_location() {
    let mut programs: SlotMap<ProgramId, ()> = SlotMap::with_key();
    let program = programs.insert(());
    let mut uniforms: SlotMap<UniformId, (ProgramId, u32)> = SlotMap::with_key();

    let first = intern_uniform(&mut uniforms, program, 3);
    let again = intern_uniform(&mut uniforms, program, 3);

    assert_eq!(first, again);
    assert_eq!(uniforms.len(), 1);
}

#[test]
fn test_intern_uniform_distinguishes_programs_and_locations() {
    let mut programs: SlotMap<ProgramId, ()> = SlotMap::with_key();
    let first_program = programs.insert(());
    let second_program = programs.insert(());
    let mut uniforms: SlotMap<UniformId, (ProgramId, u32)> = SlotMap::with_key();

    let a = intern_uniform(&mut uniforms, first_program, 0);
    let b = intern_uniform(&mut uniforms, first_program, 1);
    let c = intern_uniform(&mut uniforms, second_program, 0);

    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(uniforms.len(), 3);
    assert_eq!(uniforms[c], (second_program, 0));
}
