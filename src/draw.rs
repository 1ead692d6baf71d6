//! Drawing boundary. The engine never touches pixels: it describes lines,
//! pixels and boxes to a `DrawSink`, and the host turns those into canvas calls.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tone {
    Black = 0,
    White = 1,
}

impl Tone {
    pub fn from_word(word: i32) -> Tone {
        if word == 0 {
            Tone::Black
        } else {
            Tone::White
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

pub trait DrawSink {
    /// Vertical line at column `x` covering rows `y0..=y1`.
    fn vline(&mut self, x: i32, y0: i32, y1: i32, tone: Tone);
    fn pixel(&mut self, x: i32, y: i32, tone: Tone);
    /// Horizontal line at row `y` covering columns `x0..=x1`.
    fn hline(&mut self, x0: i32, x1: i32, y: i32, tone: Tone);
    /// One-pixel outline.
    fn rect(&mut self, rect: Rect, tone: Tone);
    fn fill_rect(&mut self, rect: Rect, tone: Tone);
    /// Text drawn by the host inside `frame`, left aligned, word wrapped.
    fn text(&mut self, frame: Rect, text: &str);
}

pub const OP_VLINE: i32 = 1;
pub const OP_PIXEL: i32 = 2;
pub const OP_HLINE: i32 = 3;
pub const OP_RECT: i32 = 4;
pub const OP_FILL_RECT: i32 = 5;
pub const OP_TEXT: i32 = 6;

/// Words per recorded command: opcode followed by five arguments, unused
/// ones zero.
pub const COMMAND_STRIDE: usize = 6;

/// Decoded form of one recorded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    VLine { x: i32, y0: i32, y1: i32, tone: Tone },
    Pixel { x: i32, y: i32, tone: Tone },
    HLine { x0: i32, x1: i32, y: i32, tone: Tone },
    Rect { rect: Rect, tone: Tone },
    FillRect { rect: Rect, tone: Tone },
    Text { frame: Rect },
}

impl Command {
    fn decode(words: &[i32]) -> Option<Command> {
        let &[op, a, b, c, d, e] = words else {
            return None;
        };
        let command = match op {
            OP_VLINE => Command::VLine { x: a, y0: b, y1: c, tone: Tone::from_word(d) },
            OP_PIXEL => Command::Pixel { x: a, y: b, tone: Tone::from_word(c) },
            OP_HLINE => Command::HLine { x0: a, x1: b, y: c, tone: Tone::from_word(d) },
            OP_RECT => Command::Rect { rect: Rect::new(a, b, c, d), tone: Tone::from_word(e) },
            OP_FILL_RECT => Command::FillRect {
                rect: Rect::new(a, b, c, d),
                tone: Tone::from_word(e),
            },
            OP_TEXT => Command::Text { frame: Rect::new(a, b, c, d) },
            _ => return None,
        };
        Some(command)
    }
}

/// Flat command buffer handed to the host once per frame.
///
/// Storage is kept between frames; `clear` only resets lengths.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    words: Vec<i32>,
    text: String,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.text.clear();
    }

    pub fn words(&self) -> &[i32] {
        &self.words
    }

    pub fn words_mut(&mut self) -> &mut [i32] {
        &mut self.words
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.words.len() / COMMAND_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Overlay text of the last `OP_TEXT` command, empty if none.
    pub fn overlay_text(&self) -> &str {
        &self.text
    }

    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.words.chunks_exact(COMMAND_STRIDE).filter_map(Command::decode)
    }

    #[inline]
    fn push(&mut self, command: [i32; COMMAND_STRIDE]) {
        self.words.extend_from_slice(&command);
    }
}

impl DrawSink for DrawList {
    fn vline(&mut self, x: i32, y0: i32, y1: i32, tone: Tone) {
        self.push([OP_VLINE, x, y0, y1, tone as i32, 0]);
    }

    fn pixel(&mut self, x: i32, y: i32, tone: Tone) {
        self.push([OP_PIXEL, x, y, tone as i32, 0, 0]);
    }

    fn hline(&mut self, x0: i32, x1: i32, y: i32, tone: Tone) {
        self.push([OP_HLINE, x0, x1, y, tone as i32, 0]);
    }

    fn rect(&mut self, rect: Rect, tone: Tone) {
        self.push([OP_RECT, rect.x, rect.y, rect.w, rect.h, tone as i32]);
    }

    fn fill_rect(&mut self, rect: Rect, tone: Tone) {
        self.push([OP_FILL_RECT, rect.x, rect.y, rect.w, rect.h, tone as i32]);
    }

    fn text(&mut self, frame: Rect, text: &str) {
        self.push([OP_TEXT, frame.x, frame.y, frame.w, frame.h, 0]);
        self.text.clear();
        self.text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_decodes() {
        let mut list = DrawList::new();
        list.vline(3, 10, 20, Tone::White);
        list.pixel(4, 11, Tone::Black);
        list.hline(1, 143, 95, Tone::White);
        list.rect(Rect::new(0, 24, 144, 142), Tone::White);
        list.fill_rect(Rect::new(0, 0, 143, 20), Tone::Black);
        list.text(Rect::new(0, 0, 143, 20), " (5.0,-2.0) 4ms 250fps");

        assert_eq!(list.len(), 6);
        assert_eq!(list.words().len(), 6 * COMMAND_STRIDE);
        assert_eq!(&list.words()[..COMMAND_STRIDE], &[OP_VLINE, 3, 10, 20, 1, 0]);
        let commands: Vec<_> = list.commands().collect();
        assert_eq!(commands[1], Command::Pixel { x: 4, y: 11, tone: Tone::Black });
        assert_eq!(
            commands[3],
            Command::Rect { rect: Rect::new(0, 24, 144, 142), tone: Tone::White }
        );
        assert_eq!(commands[5], Command::Text { frame: Rect::new(0, 0, 143, 20) });
        assert_eq!(list.overlay_text(), " (5.0,-2.0) 4ms 250fps");
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut list = DrawList::new();
        for x in 0..100 {
            list.pixel(x, 0, Tone::White);
        }
        let capacity = list.words.capacity();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.overlay_text(), "");
        assert_eq!(list.words.capacity(), capacity);
    }
}
