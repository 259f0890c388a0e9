//! Field-path construction and tag collapsing.
//!
//! A path is built incrementally during traversal: the root is the shape's
//! declared name (or [`ROOT`]), struct fields append `.<name>`, sequence
//! elements and map entries append `[<index or key>]`.

/// Root segment used when the compared shape is anonymous.
pub const ROOT: &str = "$";

/// Segment appended once a custom comparator takes over a subtree.
pub const CUSTOMIZED: &str = "$[customized]";

/// Suffix of length-mismatch records.
pub const LENGTH: &str = "[Length]";

/// One step from a value to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Struct field, rendered `.<name>`
    Field(&'static str),
    /// Sequence element, rendered `[<index>]`
    Index(usize),
    /// Map entry, rendered `[<key>]`
    Key(String),
    /// Pointer target: the path does not change
    Same,
    /// Dynamic value unwrapped to its concrete shape, rendered `.<name>` when named
    Shape(&'static str),
}

impl Segment {
    /// Append this segment to `path`
    pub fn apply(&self, path: &str) -> String {
        match self {
            Segment::Field(name) => field(path, name),
            Segment::Index(i) => index(path, *i),
            Segment::Key(k) => key(path, k),
            Segment::Same => path.to_string(),
            Segment::Shape(name) => dynamic(path, name),
        }
    }

    /// Depth consumed by descending through this segment
    pub fn depth_cost(&self) -> usize {
        match self {
            Segment::Field(_) | Segment::Shape(_) => 1,
            Segment::Index(_) | Segment::Key(_) | Segment::Same => 0,
        }
    }
}

pub fn field(path: &str, name: &str) -> String {
    let mut out = String::with_capacity(path.len() + name.len() + 1);
    out.push_str(path);
    out.push('.');
    out.push_str(name);
    out
}

pub fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

pub fn key(path: &str, k: &str) -> String {
    format!("{}[{}]", path, k)
}

pub fn dynamic(path: &str, shape_name: &str) -> String {
    if shape_name.trim().is_empty() {
        path.to_string()
    } else {
        field(path, shape_name)
    }
}

pub fn length(path: &str) -> String {
    format!("{}{}", path, LENGTH)
}

pub fn customized(path: &str) -> String {
    field(path, CUSTOMIZED)
}

/// Collapse every bracketed segment of a path.
///
/// `Person.Schools[0].Buildings[2].Name` becomes `Person.Schools.Buildings.Name`.
/// Idempotent: a tag has no brackets left to remove.
pub fn tag(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_render() {
        assert_eq!(Segment::Field("Name").apply("Person"), "Person.Name");
        assert_eq!(Segment::Index(3).apply("Person.Parents"), "Person.Parents[3]");
        assert_eq!(
            Segment::Key("1".into()).apply("Building.BuildingMap"),
            "Building.BuildingMap[1]"
        );
        assert_eq!(Segment::Same.apply("Person.Loc"), "Person.Loc");
        assert_eq!(Segment::Shape("Dog").apply("Zoo.Pet"), "Zoo.Pet.Dog");
        assert_eq!(Segment::Shape("").apply("Zoo.Pet"), "Zoo.Pet");
    }

    #[test]
    fn test_length_and_customized() {
        assert_eq!(length("Person.Parents"), "Person.Parents[Length]");
        assert_eq!(customized("Person.Parents"), "Person.Parents.$[customized]");
    }

    #[test]
    fn test_tag_collapses_indices() {
        assert_eq!(
            tag("Person.Schools[0].Buildings[2].Name"),
            "Person.Schools.Buildings.Name"
        );
        assert_eq!(tag("Person.Parents[Length]"), "Person.Parents");
        assert_eq!(tag("$[0]"), "$");
        assert_eq!(tag("Person.Name"), "Person.Name");
    }

    #[test]
    fn test_tag_handles_keys_with_dots() {
        assert_eq!(tag("Config.Map[a.b].Value"), "Config.Map.Value");
    }

    #[test]
    fn test_tag_idempotent() {
        let once = tag("Person.Schools[0].Buildings[2].Name");
        assert_eq!(tag(&once), once);
    }

    #[test]
    fn test_depth_cost() {
        assert_eq!(Segment::Field("x").depth_cost(), 1);
        assert_eq!(Segment::Index(0).depth_cost(), 0);
        assert_eq!(Segment::Same.depth_cost(), 0);
    }
}
