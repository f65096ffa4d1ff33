use std::fmt;

/// The error taxonomy, flattened into one enum. The assembler-error/
/// execution-error split is kept conceptually (see the doc comment on each
/// variant) rather than as nested types, matching how the reference project
/// keeps a single flat `ErrorKind` rather than a class hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // --- Assembler errors: syntax ---
    /// Unterminated string, unknown escape, or malformed character literal.
    LexError(String),
    /// Unmatched parentheses, or a `$`-prefixed token that isn't a known register.
    InstructionSyntax(String),
    /// A directive's arity or argument shape doesn't match its table entry.
    DirectiveSyntax(String),
    /// A line is neither a recognized directive, instruction, nor valid label.
    UnrecognizedLine(String),

    // --- Assembler errors: semantic ---
    /// `.align`/`.space` argument wasn't the non-negative integer the directive requires.
    DirectiveSemantic(String),
    /// An instruction's arity didn't match any of its accepted argument-count forms.
    BadArguments(String),
    /// A label was defined twice outside of the two reserved segment entries.
    DuplicateSymbol(String),
    /// A label reference never resolved during pass 2 resolution.
    UnknownLabel(String),
    /// A mnemonic absent from both the instruction and pseudo-instruction tables.
    UnknownInstruction(String),
    /// An immediate value didn't fit the field it was packed into.
    ImmediateOverflow(i64),
    /// A shift amount fell outside `0..=31`.
    InvalidShamt(i64),
    /// `$`-prefixed text that parses as neither a numeric nor an ABI register name.
    UnknownRegister(String),

    // --- Execution errors ---
    /// A memory access fell outside `0..SIZE` or violated alignment.
    MemoryAccess(String),
    /// The datapath's tick loop failed to reach a fixpoint within its iteration cap.
    NonConvergingTick,
}

/// An assembler error, always carrying the 1-based source line number it was
/// detected on. All errors are fatal: assembly stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    pub line: u32,
    pub kind: ErrorKind,
}

impl AssembleError {
    pub fn new(line: u32, kind: ErrorKind) -> Self {
        AssembleError { line, kind }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::LexError(s) => write!(f, "lexical error: {s}"),
            ErrorKind::InstructionSyntax(s) => write!(f, "syntax error: {s}"),
            ErrorKind::DirectiveSyntax(s) => write!(f, "directive syntax error: {s}"),
            ErrorKind::UnrecognizedLine(s) => write!(f, "unrecognized line: {s}"),
            ErrorKind::DirectiveSemantic(s) => write!(f, "directive error: {s}"),
            ErrorKind::BadArguments(s) => write!(f, "bad arguments: {s}"),
            ErrorKind::DuplicateSymbol(s) => write!(f, "duplicate symbol: {s}"),
            ErrorKind::UnknownLabel(s) => write!(f, "undefined label: {s}"),
            ErrorKind::UnknownInstruction(s) => write!(f, "unknown instruction: {s}"),
            ErrorKind::ImmediateOverflow(v) => write!(
                f,
                "immediate overflow on {v} (valid range {},{})",
                i16::MIN,
                i16::MAX
            ),
            ErrorKind::InvalidShamt(v) => write!(f, "invalid shift amount: {v} (valid range 0,31)"),
            ErrorKind::UnknownRegister(s) => write!(f, "unknown register: {s}"),
            ErrorKind::MemoryAccess(s) => write!(f, "memory access error: {s}"),
            ErrorKind::NonConvergingTick => {
                write!(f, "datapath did not reach a fixpoint within the iteration cap")
            }
        }
    }
}

impl std::error::Error for ErrorKind {}
impl std::error::Error for AssembleError {}

pub type AssembleResult<T> = Result<T, ErrorKind>;
