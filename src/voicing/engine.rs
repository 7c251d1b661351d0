//! Voicing engine
//!
//! Chooses octave placements for a chord's tones: role-ordered tone selection,
//! a close stack around the center register, then a cost search over
//! inversions and octave shifts.

use super::types::{ToneRole, VoicingOptions, VoicingResult};
use crate::chord::{ChordKind, ChordSymbol};
use crate::pitch::{Pitch, PitchClass};

/// Octave shifts tried for every inversion, in tie-break order.
const OCTAVE_SHIFTS: [i32; 3] = [-12, 0, 12];

/// A chord tone together with its harmonic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedTone {
    pub pitch_class: PitchClass,
    /// Semitones above the root, 0-11
    pub offset: u8,
    pub role: ToneRole,
}

/// Assign a role to every distinct tone of `chord`, root first.
///
/// A minor third counts as the third unless a major third is also present, in
/// which case it is the altered #9. The sixth only acts as a seventh in a
/// diminished seventh chord.
pub fn classify_tones(chord: &ChordSymbol) -> Vec<ClassifiedTone> {
    let root = chord.root.semitone() as i32;
    let tones: Vec<(PitchClass, u8)> = chord
        .tones()
        .into_iter()
        .map(|pc| (pc, (pc.semitone() as i32 - root).rem_euclid(12) as u8))
        .collect();

    let has_major_third = tones.iter().any(|(_, offset)| *offset == 4);
    let fully_diminished = chord.kind == ChordKind::Diminished7;

    tones
        .into_iter()
        .map(|(pitch_class, offset)| ClassifiedTone {
            pitch_class,
            offset,
            role: classify_offset(offset, has_major_third, fully_diminished),
        })
        .collect()
}

fn classify_offset(offset: u8, has_major_third: bool, fully_diminished: bool) -> ToneRole {
    match offset {
        0 => ToneRole::Root,
        4 => ToneRole::Third,
        3 if has_major_third => ToneRole::Altered,
        3 => ToneRole::Third,
        10 | 11 => ToneRole::Seventh,
        9 if fully_diminished => ToneRole::Seventh,
        7 => ToneRole::Fifth,
        1 | 6 | 8 => ToneRole::Altered,
        2 | 5 | 9 => ToneRole::Tension,
        _ => ToneRole::Other,
    }
}

/// A tone picked for a voicing, before octave placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedTone {
    pub pitch_class: PitchClass,
    pub role: ToneRole,
}

struct Selection {
    tones: Vec<SelectedTone>,
    limit: usize,
}

impl Selection {
    fn is_full(&self) -> bool {
        self.tones.len() >= self.limit
    }

    /// Add a tone unless the voicing is full or already sounds that pitch class.
    fn offer(&mut self, pitch_class: PitchClass, role: ToneRole) {
        if self.is_full() || self.tones.iter().any(|t| t.pitch_class == pitch_class) {
            return;
        }
        self.tones.push(SelectedTone { pitch_class, role });
    }

    /// Add a tone even if its pitch class is already present.
    fn double(&mut self, tone: SelectedTone) {
        if !self.is_full() {
            self.tones.push(tone);
        }
    }
}

/// Pick exactly `options.voice_count` tones in priority order:
/// bass (or root), one third, one seventh, altered tones, tensions, the fifth,
/// then doubled root and finally repeats of the last tone.
pub fn select_tones(chord: &ChordSymbol, options: &VoicingOptions) -> Vec<SelectedTone> {
    let classified = classify_tones(chord);
    let mut selection = Selection {
        tones: Vec::with_capacity(options.voice_count),
        limit: options.voice_count,
    };
    let root = SelectedTone {
        pitch_class: chord.root,
        role: ToneRole::Root,
    };

    match chord.bass {
        Some(bass) if options.include_bass => selection.offer(bass, ToneRole::Bass),
        _ if options.include_root => selection.offer(root.pitch_class, root.role),
        _ => {}
    }

    if let Some(third) = pick(&classified, ToneRole::Third, &[4, 3]) {
        selection.offer(third.pitch_class, third.role);
    }
    if let Some(seventh) = pick(&classified, ToneRole::Seventh, &[11, 10]) {
        selection.offer(seventh.pitch_class, seventh.role);
    }
    for role in [ToneRole::Altered, ToneRole::Tension, ToneRole::Fifth] {
        for tone in with_role(&classified, role) {
            selection.offer(tone.pitch_class, tone.role);
        }
    }

    selection.double(root);
    while let Some(last) = selection.tones.last().copied() {
        if selection.is_full() {
            break;
        }
        selection.double(last);
    }

    selection.tones
}

fn with_role(tones: &[ClassifiedTone], role: ToneRole) -> impl Iterator<Item = &ClassifiedTone> {
    tones.iter().filter(move |t| t.role == role)
}

/// The first tone of `role` whose offset appears in `preference`, else any tone of that role.
fn pick(tones: &[ClassifiedTone], role: ToneRole, preference: &[u8]) -> Option<ClassifiedTone> {
    preference
        .iter()
        .find_map(|offset| with_role(tones, role).find(|t| t.offset == *offset))
        .or_else(|| with_role(tones, role).next())
        .copied()
}

/// MIDI note nearest to `anchor` with the given pitch class. A tritone
/// distance resolves upward.
fn nearest(pitch_class: u8, anchor: i32) -> i32 {
    let up = (pitch_class as i32 - anchor).rem_euclid(12);
    if up <= 6 {
        anchor + up
    } else {
        anchor + up - 12
    }
}

/// Stack the selected tones upward from the center register, sorted ascending.
fn stack(tones: &[SelectedTone], center_register: i32) -> Vec<i32> {
    let center = Pitch::octave_c(center_register).midi();
    let mut placed: Vec<i32> = Vec::with_capacity(tones.len());

    for tone in tones {
        let pc = tone.pitch_class.semitone();
        let midi = match placed.last() {
            None if tone.role == ToneRole::Bass => nearest(pc, center - 12),
            None => nearest(pc, center),
            Some(&previous) => {
                let mut midi = nearest(pc, previous + 1);
                while midi <= previous {
                    midi += 12;
                }
                midi
            }
        };
        placed.push(midi);
    }

    placed.sort_unstable();
    placed
}

/// Every inversion of `base`, each at three octave shifts.
fn candidates(base: &[i32]) -> Vec<Vec<i32>> {
    let mut out = Vec::with_capacity(base.len() * OCTAVE_SHIFTS.len());
    let mut inversion = base.to_vec();

    for _ in 0..base.len() {
        for shift in OCTAVE_SHIFTS {
            out.push(inversion.iter().map(|midi| midi + shift).collect());
        }
        if !inversion.is_empty() {
            let lowest = inversion.remove(0);
            inversion.push(lowest + 12);
            inversion.sort_unstable();
        }
    }

    out
}

fn cost(candidate: &[i32], center: i32, previous: Option<&VoicingResult>, options: &VoicingOptions) -> f64 {
    let mean = candidate.iter().sum::<i32>() as f64 / candidate.len() as f64;
    let mut cost = options.register_anchor_weight * (mean - center as f64).abs();

    if let Some(previous) = previous.filter(|p| p.len() == candidate.len()) {
        for (now, before) in candidate.iter().zip(&previous.pitches) {
            let distance = (now - before.midi()).abs();
            cost += distance as f64;
            if distance > options.leap_threshold {
                cost += (distance - options.leap_threshold) as f64 * options.leap_penalty_weight;
            }
        }
    }

    cost
}

fn build_result(midi: &[i32], tones: &[SelectedTone]) -> VoicingResult {
    let pitch_classes = midi
        .iter()
        .map(|m| {
            let pc = m.rem_euclid(12) as u8;
            tones
                .iter()
                .map(|t| t.pitch_class)
                .find(|spelling| spelling.semitone() == pc)
                .unwrap_or_else(|| PitchClass::from_semitone(pc as i32, true))
        })
        .collect();

    VoicingResult {
        pitches: midi.iter().map(|m| Pitch::from_midi(*m)).collect(),
        pitch_classes,
    }
}

/// The naive close-position stack for `chord`, before any search. Not clamped
/// to the range.
pub fn close_stack(chord: &ChordSymbol, center_register: i32, options: &VoicingOptions) -> VoicingResult {
    let tones = select_tones(chord, options);
    build_result(&stack(&tones, center_register), &tones)
}

/// Voice one chord.
///
/// Candidates outside `options.range` are discarded; among the rest the lowest
/// cost wins and earlier candidates win ties. When no candidate fits the range
/// the unshifted close stack is returned. The previous voicing only counts when
/// it has the same number of voices.
///
/// # Example
/// ```
/// use chordflow::{voice_chord, ChordSymbol, VoicingOptions};
///
/// let chord: ChordSymbol = "Cmaj7".parse().unwrap();
/// let voicing = voice_chord(&chord, 4, None, &VoicingOptions::default());
/// assert_eq!(voicing.note_names(), vec!["E3", "B3", "C4", "G4"]);
/// ```
pub fn voice_chord(
    chord: &ChordSymbol,
    center_register: i32,
    previous: Option<&VoicingResult>,
    options: &VoicingOptions,
) -> VoicingResult {
    if options.voice_count == 0 {
        return VoicingResult::empty();
    }

    let tones = select_tones(chord, options);
    let base = stack(&tones, center_register);
    let center = Pitch::octave_c(center_register).midi();

    let mut best: Option<(f64, Vec<i32>)> = None;
    for candidate in candidates(&base) {
        if !candidate.iter().all(|m| options.range.contains(Pitch::from_midi(*m))) {
            continue;
        }
        let score = cost(&candidate, center, previous, options);
        if best.as_ref().map_or(true, |(lowest, _)| score < *lowest) {
            best = Some((score, candidate));
        }
    }

    let chosen = best.map(|(_, candidate)| candidate).unwrap_or(base);
    build_result(&chosen, &tones)
}

/// Voice a sequence left to right, feeding each result forward as the previous
/// voicing. Empty results do not replace the previous voicing.
pub fn voice_progression(chords: &[ChordSymbol], center_register: i32, options: &VoicingOptions) -> Vec<VoicingResult> {
    let mut previous: Option<VoicingResult> = None;
    chords
        .iter()
        .map(|chord| {
            let result = voice_chord(chord, center_register, previous.as_ref(), options);
            if !result.is_empty() {
                previous = Some(result.clone());
            }
            result
        })
        .collect()
}
