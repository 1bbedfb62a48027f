use std::{collections::HashSet, rc::Rc};

/// String table shared by every identifier and string literal of one source.
///
/// Interning the same text twice hands back the same allocation.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    strings: HashSet<Rc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Interner::default()
    }

    pub fn intern(&mut self, text: &str) -> Rc<str> {
        if let Some(existing) = self.strings.get(text) {
            return Rc::clone(existing);
        }

        let interned: Rc<str> = Rc::from(text);
        self.strings.insert(Rc::clone(&interned));
        interned
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
