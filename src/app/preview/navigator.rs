use crate::domain::PersonalizedEmail;

/// Position in the list of rendered previews. Wraps at both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewNavigator {
    index: usize,
}

impl PreviewNavigator {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn next(&mut self, len: usize) -> usize {
        self.index = if len == 0 || self.index + 1 >= len {
            0
        } else {
            self.index + 1
        };
        self.index
    }

    pub fn previous(&mut self, len: usize) -> usize {
        self.index = match len {
            0 => 0,
            _ if self.index == 0 || self.index >= len => len - 1,
            _ => self.index - 1,
        };
        self.index
    }

    pub fn current<'a>(&self, emails: &'a [PersonalizedEmail]) -> Option<&'a PersonalizedEmail> {
        emails.get(self.index)
    }
}
