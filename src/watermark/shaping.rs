//! Arabic-script shaping and bidirectional reordering.
//!
//! The glyph renderer draws characters strictly left to right with no
//! layout intelligence, so right-to-left text has to arrive pre-shaped:
//! letters mapped to their contextual presentation forms and runs
//! reordered into visual order.
//!
//! Shaping is a total function. Characters outside the joining tables
//! pass through untouched; there are no error states and identical
//! input always produces identical output.

use unicode_bidi::BidiInfo;

const ZWNJ: char = '\u{200C}';
const LAM: char = '\u{0644}';

/// Contextual presentation forms for one letter.
///
/// Right-joining letters (alef, dal, reh, waw, ...) have no initial or
/// medial form; selection falls back to isolated/final for them.
struct Forms {
    isolated: char,
    fin: char,
    initial: Option<char>,
    medial: Option<char>,
}

impl Forms {
    const fn dual(isolated: char, fin: char, initial: char, medial: char) -> Self {
        Self {
            isolated,
            fin,
            initial: Some(initial),
            medial: Some(medial),
        }
    }

    const fn right(isolated: char, fin: char) -> Self {
        Self {
            isolated,
            fin,
            initial: None,
            medial: None,
        }
    }

    /// Whether this letter can connect to the following letter.
    fn joins_forward(&self) -> bool {
        self.initial.is_some()
    }
}

/// Shape a logical string for left-to-right rendering.
///
/// Pure Latin/neutral input is returned unchanged. Otherwise the text is
/// run through contextual joining and then bidirectional reordering, so
/// the result reads correctly when drawn glyph by glyph, left to right.
pub fn shape(logical: &str) -> String {
    if !contains_arabic_script(logical) {
        return logical.to_owned();
    }

    let joined = join_presentation_forms(logical);
    reorder_visual(&joined)
}

/// True if the text contains characters from the Arabic script blocks
/// (base, supplement, or presentation forms).
pub fn contains_arabic_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0600}'..='\u{06FF}'
                | '\u{0750}'..='\u{077F}'
                | '\u{08A0}'..='\u{08FF}'
                | '\u{FB50}'..='\u{FDFF}'
                | '\u{FE70}'..='\u{FEFF}')
    })
}

/// Replace Arabic letters with their contextual presentation forms.
///
/// ZWNJ carries only joining information and is consumed; combining
/// marks are transparent to join decisions and kept in place.
fn join_presentation_forms(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if c == ZWNJ {
            i += 1;
            continue;
        }
        if is_transparent(c) {
            out.push(c);
            i += 1;
            continue;
        }

        let forms = match forms(c) {
            Some(f) => f,
            None => {
                out.push(c);
                i += 1;
                continue;
            }
        };

        let prev_connects = prev_joins_forward(&chars, i);

        // Lam + alef collapses into the mandatory ligature.
        if c == LAM && i + 1 < chars.len() {
            if let Some((isolated, fin)) = lam_alef_ligature(chars[i + 1]) {
                out.push(if prev_connects { fin } else { isolated });
                i += 2;
                continue;
            }
        }

        let next_connects = forms.joins_forward()
            && next_joinable(&chars, i).map_or(false, |j| forms_exist(chars[j]));

        let shaped = match (prev_connects, next_connects) {
            (false, false) => forms.isolated,
            (true, false) => forms.fin,
            (false, true) => forms.initial.unwrap_or(forms.isolated),
            (true, true) => forms.medial.unwrap_or(forms.fin),
        };
        out.push(shaped);
        i += 1;
    }

    out
}

/// Reorder resolved bidi runs into visual left-to-right order.
fn reorder_visual(text: &str) -> String {
    let bidi = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());
    for paragraph in &bidi.paragraphs {
        out.push_str(&bidi.reorder_line(paragraph, paragraph.range.clone()));
    }
    out
}

/// Does the closest preceding non-transparent character connect forward?
fn prev_joins_forward(chars: &[char], i: usize) -> bool {
    for k in (0..i).rev() {
        let c = chars[k];
        if c == ZWNJ {
            return false;
        }
        if is_transparent(c) {
            continue;
        }
        return forms(c).map_or(false, |f| f.joins_forward());
    }
    false
}

/// Index of the next join-relevant character, unless a ZWNJ blocks it.
fn next_joinable(chars: &[char], i: usize) -> Option<usize> {
    for (k, &c) in chars.iter().enumerate().skip(i + 1) {
        if c == ZWNJ {
            return None;
        }
        if is_transparent(c) {
            continue;
        }
        return Some(k);
    }
    None
}

fn forms_exist(c: char) -> bool {
    forms(c).is_some()
}

/// Combining marks that do not participate in joining decisions.
fn is_transparent(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Lam-alef ligature forms: (isolated, final) per alef variant.
fn lam_alef_ligature(alef: char) -> Option<(char, char)> {
    match alef {
        '\u{0622}' => Some(('\u{FEF5}', '\u{FEF6}')), // alef with madda
        '\u{0623}' => Some(('\u{FEF7}', '\u{FEF8}')), // alef with hamza above
        '\u{0625}' => Some(('\u{FEF9}', '\u{FEFA}')), // alef with hamza below
        '\u{0627}' => Some(('\u{FEFB}', '\u{FEFC}')), // plain alef
        _ => None,
    }
}

/// Presentation forms (Unicode Arabic Presentation Forms-A/B) for the
/// Arabic base letters plus the Persian additions.
fn forms(c: char) -> Option<Forms> {
    let f = match c {
        '\u{0621}' => Forms::right('\u{FE80}', '\u{FE80}'), // hamza
        '\u{0622}' => Forms::right('\u{FE81}', '\u{FE82}'), // alef madda
        '\u{0623}' => Forms::right('\u{FE83}', '\u{FE84}'), // alef hamza above
        '\u{0624}' => Forms::right('\u{FE85}', '\u{FE86}'), // waw hamza
        '\u{0625}' => Forms::right('\u{FE87}', '\u{FE88}'), // alef hamza below
        '\u{0626}' => Forms::dual('\u{FE89}', '\u{FE8A}', '\u{FE8B}', '\u{FE8C}'), // yeh hamza
        '\u{0627}' => Forms::right('\u{FE8D}', '\u{FE8E}'), // alef
        '\u{0628}' => Forms::dual('\u{FE8F}', '\u{FE90}', '\u{FE91}', '\u{FE92}'), // beh
        '\u{0629}' => Forms::right('\u{FE93}', '\u{FE94}'), // teh marbuta
        '\u{062A}' => Forms::dual('\u{FE95}', '\u{FE96}', '\u{FE97}', '\u{FE98}'), // teh
        '\u{062B}' => Forms::dual('\u{FE99}', '\u{FE9A}', '\u{FE9B}', '\u{FE9C}'), // theh
        '\u{062C}' => Forms::dual('\u{FE9D}', '\u{FE9E}', '\u{FE9F}', '\u{FEA0}'), // jeem
        '\u{062D}' => Forms::dual('\u{FEA1}', '\u{FEA2}', '\u{FEA3}', '\u{FEA4}'), // hah
        '\u{062E}' => Forms::dual('\u{FEA5}', '\u{FEA6}', '\u{FEA7}', '\u{FEA8}'), // khah
        '\u{062F}' => Forms::right('\u{FEA9}', '\u{FEAA}'), // dal
        '\u{0630}' => Forms::right('\u{FEAB}', '\u{FEAC}'), // thal
        '\u{0631}' => Forms::right('\u{FEAD}', '\u{FEAE}'), // reh
        '\u{0632}' => Forms::right('\u{FEAF}', '\u{FEB0}'), // zain
        '\u{0633}' => Forms::dual('\u{FEB1}', '\u{FEB2}', '\u{FEB3}', '\u{FEB4}'), // seen
        '\u{0634}' => Forms::dual('\u{FEB5}', '\u{FEB6}', '\u{FEB7}', '\u{FEB8}'), // sheen
        '\u{0635}' => Forms::dual('\u{FEB9}', '\u{FEBA}', '\u{FEBB}', '\u{FEBC}'), // sad
        '\u{0636}' => Forms::dual('\u{FEBD}', '\u{FEBE}', '\u{FEBF}', '\u{FEC0}'), // dad
        '\u{0637}' => Forms::dual('\u{FEC1}', '\u{FEC2}', '\u{FEC3}', '\u{FEC4}'), // tah
        '\u{0638}' => Forms::dual('\u{FEC5}', '\u{FEC6}', '\u{FEC7}', '\u{FEC8}'), // zah
        '\u{0639}' => Forms::dual('\u{FEC9}', '\u{FECA}', '\u{FECB}', '\u{FECC}'), // ain
        '\u{063A}' => Forms::dual('\u{FECD}', '\u{FECE}', '\u{FECF}', '\u{FED0}'), // ghain
        '\u{0640}' => Forms::dual('\u{0640}', '\u{0640}', '\u{0640}', '\u{0640}'), // tatweel
        '\u{0641}' => Forms::dual('\u{FED1}', '\u{FED2}', '\u{FED3}', '\u{FED4}'), // feh
        '\u{0642}' => Forms::dual('\u{FED5}', '\u{FED6}', '\u{FED7}', '\u{FED8}'), // qaf
        '\u{0643}' => Forms::dual('\u{FED9}', '\u{FEDA}', '\u{FEDB}', '\u{FEDC}'), // kaf
        '\u{0644}' => Forms::dual('\u{FEDD}', '\u{FEDE}', '\u{FEDF}', '\u{FEE0}'), // lam
        '\u{0645}' => Forms::dual('\u{FEE1}', '\u{FEE2}', '\u{FEE3}', '\u{FEE4}'), // meem
        '\u{0646}' => Forms::dual('\u{FEE5}', '\u{FEE6}', '\u{FEE7}', '\u{FEE8}'), // noon
        '\u{0647}' => Forms::dual('\u{FEE9}', '\u{FEEA}', '\u{FEEB}', '\u{FEEC}'), // heh
        '\u{0648}' => Forms::right('\u{FEED}', '\u{FEEE}'), // waw
        '\u{0649}' => Forms::right('\u{FEEF}', '\u{FEF0}'), // alef maksura
        '\u{064A}' => Forms::dual('\u{FEF1}', '\u{FEF2}', '\u{FEF3}', '\u{FEF4}'), // yeh
        // Persian additions
        '\u{067E}' => Forms::dual('\u{FB56}', '\u{FB57}', '\u{FB58}', '\u{FB59}'), // peh
        '\u{0686}' => Forms::dual('\u{FB7A}', '\u{FB7B}', '\u{FB7C}', '\u{FB7D}'), // tcheh
        '\u{0698}' => Forms::right('\u{FB8A}', '\u{FB8B}'), // jeh
        '\u{06A9}' => Forms::dual('\u{FB8E}', '\u{FB8F}', '\u{FB90}', '\u{FB91}'), // keheh
        '\u{06AF}' => Forms::dual('\u{FB92}', '\u{FB93}', '\u{FB94}', '\u{FB95}'), // gaf
        '\u{06CC}' => Forms::dual('\u{FBFC}', '\u{FBFD}', '\u{FBFE}', '\u{FBFF}'), // farsi yeh
        _ => return None,
    };
    Some(f)
}
