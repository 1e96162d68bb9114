use std::fmt;

/// What a [`Component`][crate::Component] is: a primitive gate, a primary
/// port or an instance of a library circuit referenced by name.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ComponentKind {
    /// Two-input conjunction.
    And,
    /// Two-input disjunction.
    Or,
    /// Two-input exclusive or.
    ///
    /// Unlike [`And`][Self::And] and [`Or`][Self::Or] this primitive has no
    /// built-in gate expansion; elaboration resolves it against a library
    /// circuit named `XOR`.
    Xor,
    /// Single-input negation.
    Not,
    /// Primary input port of the containing circuit. Its single output slot
    /// holds the user-toggled value.
    Input,
    /// Primary output port of the containing circuit. It consumes one signal
    /// and has no output slots of its own.
    Output,
    /// Instance of the library circuit with the given name.
    Subcircuit(String),
}

impl ComponentKind {
    /// The canonical name of this kind, as displayed and as stored in the
    /// serialized form.
    pub fn name(&self) -> &str {
        match self {
            ComponentKind::And => "AND",
            ComponentKind::Or => "OR",
            ComponentKind::Xor => "XOR",
            ComponentKind::Not => "NOT",
            ComponentKind::Input => "INPUT",
            ComponentKind::Output => "OUTPUT",
            ComponentKind::Subcircuit(name) => name,
        }
    }

    /// Maps a stored name back to a kind.
    ///
    /// The six primitive names take precedence; any other name is a
    /// subcircuit reference, resolved against the library at elaboration
    /// time rather than here.
    pub fn from_name(name: &str) -> Self {
        match name {
            "AND" => ComponentKind::And,
            "OR" => ComponentKind::Or,
            "XOR" => ComponentKind::Xor,
            "NOT" => ComponentKind::Not,
            "INPUT" => ComponentKind::Input,
            "OUTPUT" => ComponentKind::Output,
            _ => ComponentKind::Subcircuit(name.to_owned()),
        }
    }

    /// Whether this is one of the six primitive kinds.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, ComponentKind::Subcircuit(_))
    }

    /// The fixed input slot count of a primitive kind.
    ///
    /// Returns `None` for subcircuit references, whose slot count follows
    /// the referenced circuit's primary input population instead.
    pub fn fixed_inputs(&self) -> Option<usize> {
        match self {
            ComponentKind::And | ComponentKind::Or | ComponentKind::Xor => Some(2),
            ComponentKind::Not | ComponentKind::Output => Some(1),
            ComponentKind::Input => Some(0),
            ComponentKind::Subcircuit(_) => None,
        }
    }

    /// The fixed output slot count of a primitive kind, `None` for
    /// subcircuit references.
    pub fn fixed_outputs(&self) -> Option<usize> {
        match self {
            ComponentKind::And
            | ComponentKind::Or
            | ComponentKind::Xor
            | ComponentKind::Not
            | ComponentKind::Input => Some(1),
            ComponentKind::Output => Some(0),
            ComponentKind::Subcircuit(_) => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names_round_trip() {
        for kind in [
            ComponentKind::And,
            ComponentKind::Or,
            ComponentKind::Xor,
            ComponentKind::Not,
            ComponentKind::Input,
            ComponentKind::Output,
        ] {
            assert_eq!(ComponentKind::from_name(kind.name()), kind);
            assert!(kind.is_primitive());
            assert!(kind.fixed_inputs().is_some());
            assert!(kind.fixed_outputs().is_some());
        }
    }

    #[test]
    fn unknown_names_become_references() {
        let kind = ComponentKind::from_name("HALF_ADDER");
        assert_eq!(kind, ComponentKind::Subcircuit("HALF_ADDER".to_owned()));
        assert!(!kind.is_primitive());
        assert_eq!(kind.fixed_inputs(), None);
        assert_eq!(kind.name(), "HALF_ADDER");
    }
}
