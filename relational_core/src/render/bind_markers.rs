//! Bind parameter placeholders

/// How a dialect spells bind parameter placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// `prefix` followed by a counter starting at `base`, e.g. `$1` or `@P0`
    Indexed { prefix: &'static str, base: usize },
    /// The same placeholder for every parameter, e.g. `?`
    Anonymous(&'static str),
}

/// A placeholder rendered into SQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMarker {
    placeholder: String,
    index: usize,
}

impl BindMarker {
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Zero-based position of the parameter in the statement
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Stateful marker generator; one instance per rendered statement
#[derive(Debug, Clone)]
pub struct BindMarkers {
    style: MarkerStyle,
    counter: usize,
}

impl BindMarkers {
    pub fn new(style: MarkerStyle) -> Self {
        Self { style, counter: 0 }
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }

    pub fn next(&mut self) -> BindMarker {
        let index = self.counter;
        self.counter += 1;

        let placeholder = match self.style {
            MarkerStyle::Indexed { prefix, base } => format!("{}{}", prefix, base + index),
            MarkerStyle::Anonymous(placeholder) => placeholder.to_string(),
        };
        BindMarker { placeholder, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_markers() {
        let mut markers = BindMarkers::new(MarkerStyle::Indexed {
            prefix: "$",
            base: 1,
        });
        let first = markers.next();
        let second = markers.next();

        assert_eq!(first.placeholder(), "$1");
        assert_eq!(first.index(), 0);
        assert_eq!(second.placeholder(), "$2");
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn test_anonymous_markers() {
        let mut markers = BindMarkers::new(MarkerStyle::Anonymous("?"));
        assert_eq!(markers.next().placeholder(), "?");

        let second = markers.next();
        assert_eq!(second.placeholder(), "?");
        assert_eq!(second.index(), 1);
    }
}
