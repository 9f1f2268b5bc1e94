/// Formats a game name for display
///
/// Every alphabetic character that follows a non-alphabetic one (or starts the
/// string) is upper-cased and all others are lower-cased. A capital `S` right
/// after an apostrophe is then put back to lower case, so possessives read
/// `King's` rather than `King'S`.
pub fn display_name(name: &str) -> String {
    title_case(name).replace("'S", "'s")
}

fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;

    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}
