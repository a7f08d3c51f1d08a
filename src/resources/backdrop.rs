use bevy_ecs::prelude::Resource;

/// Horizontal scroll of the background, in field units.
///
/// Always within `(-field_width, 0]`; the renderer draws the image twice
/// side by side starting at `offset`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Backdrop {
    pub offset: f32,
}

impl Backdrop {
    pub fn scroll(&mut self, amount: f32, field_width: f32) {
        self.offset -= amount;
        if field_width > 0.0 {
            while self.offset <= -field_width {
                self.offset += field_width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_wraps() {
        let mut b = Backdrop::default();
        b.scroll(300.0, 800.0);
        assert_eq!(b.offset, -300.0);
        b.scroll(500.0, 800.0);
        assert_eq!(b.offset, 0.0);
        b.scroll(850.0, 800.0);
        assert_eq!(b.offset, -50.0);
    }
}
