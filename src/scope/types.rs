/// Structural line categories for ERB scripts
use std::fmt;

/// Structural role of one logical line.
///
/// Every successfully classified line has exactly one kind. [`LineKind::Unknown`]
/// is never produced by the classifier itself; if it reaches the indenter it is a
/// hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    Comment,
    RegionStart,
    RegionEnd,

    ConcatStart,
    ConcatEnd,

    /// `@NAME`
    FunctionDefinition,
    /// `#PRI`, `#ONLY`, `#FUNCTION`, ...
    Attribute,
    /// `$LABEL`
    Label,
    /// `[SKIPSTART]`, `[IF_DEBUG]`, ...
    SpecialBlock,
    /// `#DIM`, `#DIMS`
    VariableDefinition,

    Sif,
    If,
    ElseIf,
    Else,
    EndIf,

    Repeat,
    Rend,

    SelectCase,
    Case,
    CaseElse,
    EndSelect,

    For,
    Next,

    While,
    Wend,

    Do,
    Loop,

    Break,
    Continue,

    TryCallList,
    TryGotoList,
    TryJumpList,
    Func,
    EndFunc,

    TryCCall,
    TryCGoto,
    TryCJump,
    Catch,
    EndCatch,

    Call,
    Jump,
    Goto,
    Begin,
    Restart,
    Return,
    Throw,

    PrintData,
    StrData,
    DataList,
    EndList,
    Data,
    EndData,

    BuiltinFunction,
    /// Built-in variable or a name declared with `#DIM` in the current function
    Variable,
    /// Global user variable inferred from an assignment-like use
    InferredGlobal,

    Unknown,
}

/// How a line kind moves the indentation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEffect {
    /// Emitted at the current depth, depth unchanged
    Neutral,
    /// Emitted at the current depth, then depth + 1
    Open,
    /// Emitted at depth - 1, depth unchanged (`ELSE`, `CATCH`)
    Middle,
    /// Depth - 1, then emitted at the new depth
    Close,
    /// `CASE`/`CASEELSE`: depends on the previous significant line
    Arm,
    /// `ENDSELECT`: closes the last arm and the switch
    EndSelect,
    /// `SIF`: the next statement is indented one level
    SingleLineIf,
    /// Comment or region start: look ahead for the owning statement
    Commentary,
    /// `;#endregion` outside a comment run
    RegionEnd,
    /// Function definition, must be at depth 0
    Function,
    /// Attribute or `#DIM`, must follow the function definition at depth 0
    Declaration,
    Blank,
    Invalid,
}

impl LineKind {
    /// Blank lines, comments and region markers carry no structure of their own.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            LineKind::Blank | LineKind::Comment | LineKind::RegionStart | LineKind::RegionEnd
        )
    }

    /// Kinds that may appear in a function's declaration preamble, or precede it.
    #[must_use]
    pub fn is_preamble(self) -> bool {
        matches!(
            self,
            LineKind::FunctionDefinition | LineKind::Attribute | LineKind::VariableDefinition
        )
    }

    /// Kinds usable as the target of `++`/`--`.
    #[must_use]
    pub fn is_variable(self) -> bool {
        matches!(self, LineKind::Variable | LineKind::InferredGlobal)
    }

    /// Kinds that pull a preceding comment run one level out.
    #[must_use]
    pub fn dedents_leading_comments(self) -> bool {
        matches!(
            self,
            LineKind::ElseIf
                | LineKind::Else
                | LineKind::Case
                | LineKind::CaseElse
                | LineKind::EndSelect
        )
    }

    #[must_use]
    pub fn scope_effect(self) -> ScopeEffect {
        match self {
            LineKind::If
            | LineKind::Repeat
            | LineKind::While
            | LineKind::For
            | LineKind::Do
            | LineKind::TryCallList
            | LineKind::TryGotoList
            | LineKind::TryJumpList
            | LineKind::TryCCall
            | LineKind::TryCGoto
            | LineKind::TryCJump
            | LineKind::SelectCase
            | LineKind::PrintData
            | LineKind::StrData
            | LineKind::DataList => ScopeEffect::Open,

            LineKind::ElseIf | LineKind::Else | LineKind::Catch => ScopeEffect::Middle,

            LineKind::EndIf
            | LineKind::Rend
            | LineKind::Wend
            | LineKind::Next
            | LineKind::Loop
            | LineKind::EndFunc
            | LineKind::EndCatch
            | LineKind::EndList
            | LineKind::EndData => ScopeEffect::Close,

            LineKind::Case | LineKind::CaseElse => ScopeEffect::Arm,
            LineKind::EndSelect => ScopeEffect::EndSelect,
            LineKind::Sif => ScopeEffect::SingleLineIf,
            LineKind::Comment | LineKind::RegionStart => ScopeEffect::Commentary,
            LineKind::RegionEnd => ScopeEffect::RegionEnd,
            LineKind::FunctionDefinition => ScopeEffect::Function,
            LineKind::Attribute | LineKind::VariableDefinition => ScopeEffect::Declaration,
            LineKind::Blank => ScopeEffect::Blank,
            LineKind::Unknown => ScopeEffect::Invalid,

            LineKind::ConcatStart
            | LineKind::ConcatEnd
            | LineKind::Label
            | LineKind::SpecialBlock
            | LineKind::Break
            | LineKind::Continue
            | LineKind::Func
            | LineKind::Call
            | LineKind::Jump
            | LineKind::Goto
            | LineKind::Begin
            | LineKind::Restart
            | LineKind::Return
            | LineKind::Throw
            | LineKind::Data
            | LineKind::BuiltinFunction
            | LineKind::Variable
            | LineKind::InferredGlobal => ScopeEffect::Neutral,
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Blank => "blank",
            LineKind::Comment => "comment",
            LineKind::RegionStart => "region",
            LineKind::RegionEnd => "endregion",
            LineKind::ConcatStart => "concat-start",
            LineKind::ConcatEnd => "concat-end",
            LineKind::FunctionDefinition => "function",
            LineKind::Attribute => "attribute",
            LineKind::Label => "label",
            LineKind::SpecialBlock => "special-block",
            LineKind::VariableDefinition => "dim",
            LineKind::Sif => "SIF",
            LineKind::If => "IF",
            LineKind::ElseIf => "ELSEIF",
            LineKind::Else => "ELSE",
            LineKind::EndIf => "ENDIF",
            LineKind::Repeat => "REPEAT",
            LineKind::Rend => "REND",
            LineKind::SelectCase => "SELECTCASE",
            LineKind::Case => "CASE",
            LineKind::CaseElse => "CASEELSE",
            LineKind::EndSelect => "ENDSELECT",
            LineKind::For => "FOR",
            LineKind::Next => "NEXT",
            LineKind::While => "WHILE",
            LineKind::Wend => "WEND",
            LineKind::Do => "DO",
            LineKind::Loop => "LOOP",
            LineKind::Break => "BREAK",
            LineKind::Continue => "CONTINUE",
            LineKind::TryCallList => "TRYCALLLIST",
            LineKind::TryGotoList => "TRYGOTOLIST",
            LineKind::TryJumpList => "TRYJUMPLIST",
            LineKind::Func => "FUNC",
            LineKind::EndFunc => "ENDFUNC",
            LineKind::TryCCall => "TRYCCALL",
            LineKind::TryCGoto => "TRYCGOTO",
            LineKind::TryCJump => "TRYCJUMP",
            LineKind::Catch => "CATCH",
            LineKind::EndCatch => "ENDCATCH",
            LineKind::Call => "call",
            LineKind::Jump => "jump",
            LineKind::Goto => "goto",
            LineKind::Begin => "BEGIN",
            LineKind::Restart => "RESTART",
            LineKind::Return => "return",
            LineKind::Throw => "THROW",
            LineKind::PrintData => "printdata",
            LineKind::StrData => "STRDATA",
            LineKind::DataList => "DATALIST",
            LineKind::EndList => "ENDLIST",
            LineKind::Data => "data",
            LineKind::EndData => "ENDDATA",
            LineKind::BuiltinFunction => "builtin",
            LineKind::Variable => "variable",
            LineKind::InferredGlobal => "inferred-global",
            LineKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}
