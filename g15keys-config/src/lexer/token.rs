use logos::Logos;

/// Tokens of the list part of a descriptor (`emit` operands and
/// `set-leds` operands)
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[regex(r"k\+[0-9]+", |lex| lex.slice()[2..].parse::<u32>().ok())]
    KeyPress(u32),

    #[regex(r"k-[0-9]+", |lex| lex.slice()[2..].parse::<u32>().ok())]
    KeyRelease(u32),

    #[regex(r"m\+[0-9]+", |lex| lex.slice()[2..].parse::<u32>().ok())]
    ButtonPress(u32),

    #[regex(r"m-[0-9]+", |lex| lex.slice()[2..].parse::<u32>().ok())]
    ButtonRelease(u32),

    // M-key LEDs
    #[regex(r"[mM][1-3]", |lex| lex.slice()[1..].parse::<u8>().ok())]
    Led(u8),

    #[regex(r"[mM][rR]")]
    LedRecord,

    #[token(",")]
    Comma,
}
