/// Keyword tables for ERB line classification
///
/// The tables are plain data. They are turned into one lookup map on first use
/// (`LazyLock`), so the set of recognised spellings can be tested and extended
/// without touching the classifier's control flow.
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::scope::LineKind;

/// Statement keywords with their own structural kind
const STATEMENTS: &[(&str, LineKind)] = &[
    ("SIF", LineKind::Sif),
    ("IF", LineKind::If),
    ("ELSEIF", LineKind::ElseIf),
    ("ELSE", LineKind::Else),
    ("ENDIF", LineKind::EndIf),
    ("REPEAT", LineKind::Repeat),
    ("REND", LineKind::Rend),
    ("SELECTCASE", LineKind::SelectCase),
    ("CASE", LineKind::Case),
    ("CASEELSE", LineKind::CaseElse),
    ("ENDSELECT", LineKind::EndSelect),
    ("FOR", LineKind::For),
    ("NEXT", LineKind::Next),
    ("WHILE", LineKind::While),
    ("WEND", LineKind::Wend),
    ("DO", LineKind::Do),
    ("LOOP", LineKind::Loop),
    ("BREAK", LineKind::Break),
    ("CONTINUE", LineKind::Continue),
    ("TRYCALLLIST", LineKind::TryCallList),
    ("TRYGOTOLIST", LineKind::TryGotoList),
    ("TRYJUMPLIST", LineKind::TryJumpList),
    ("FUNC", LineKind::Func),
    ("ENDFUNC", LineKind::EndFunc),
    ("TRYCCALL", LineKind::TryCCall),
    ("TRYCCALLFORM", LineKind::TryCCall),
    ("TRYCGOTO", LineKind::TryCGoto),
    ("TRYCGOTOFORM", LineKind::TryCGoto),
    ("TRYCJUMP", LineKind::TryCJump),
    ("TRYCJUMPFORM", LineKind::TryCJump),
    ("CATCH", LineKind::Catch),
    ("ENDCATCH", LineKind::EndCatch),
    ("BEGIN", LineKind::Begin),
    ("RESTART", LineKind::Restart),
    ("CALL", LineKind::Call),
    ("CALLF", LineKind::Call),
    ("CALLFORM", LineKind::Call),
    ("CALLFORMF", LineKind::Call),
    ("TRYCALL", LineKind::Call),
    ("TRYCALLFORM", LineKind::Call),
    ("JUMP", LineKind::Jump),
    ("JUMPFORM", LineKind::Jump),
    ("TRYJUMP", LineKind::Jump),
    ("TRYJUMPFORM", LineKind::Jump),
    ("GOTO", LineKind::Goto),
    ("GOTOFORM", LineKind::Goto),
    ("TRYGOTO", LineKind::Goto),
    ("TRYGOTOFORM", LineKind::Goto),
    ("RETURN", LineKind::Return),
    ("RETURNF", LineKind::Return),
    ("RETURNFORM", LineKind::Return),
    ("THROW", LineKind::Throw),
    ("PRINTDATA", LineKind::PrintData),
    ("PRINTDATAD", LineKind::PrintData),
    ("PRINTDATADL", LineKind::PrintData),
    ("PRINTDATADW", LineKind::PrintData),
    ("PRINTDATAK", LineKind::PrintData),
    ("PRINTDATAKL", LineKind::PrintData),
    ("PRINTDATAKW", LineKind::PrintData),
    ("PRINTDATAL", LineKind::PrintData),
    ("PRINTDATAW", LineKind::PrintData),
    ("STRDATA", LineKind::StrData),
    ("DATALIST", LineKind::DataList),
    ("ENDLIST", LineKind::EndList),
    ("DATA", LineKind::Data),
    ("DATAFORM", LineKind::Data),
    ("ENDDATA", LineKind::EndData),
];

/// Built-in instructions and functions usable as a statement
const BUILTIN_FUNCTIONS: &[&str] = &[
    "ABS", "ADDCHARA", "ADDCOPYCHARA", "ADDDEFCHARA", "ADDSPCHARA", "ADDVOIDCHARA",
    "ALIGNMENT", "ALLSAMES", "ARRAYCOPY", "ARRAYMSORT", "ARRAYREMOVE", "ARRAYSHIFT",
    "ARRAYSORT", "ASSERT", "AWAIT", "BAR", "BARSTR", "CALLEVENT", "CALLTRAIN", "CBGCLEAR",
    "CBGCLEARBUTTON", "CBGREMOVEBMAP", "CBGREMOVERANGE", "CBGSETBMAPG",
    "CBGSETBUTTONSPRITE", "CBGSETG", "CBGSETSPRITE", "CBRT", "CHARATU", "CHKCHARADATA",
    "CHKDATA", "CHKFONT", "CLEARBIT", "CLEARLINE", "CLEARTEXTBOX", "CLIENTHEIGHT",
    "CLIENTWIDTH", "CMATCH", "COLOR_FROMNAME", "COLOR_FROMRGB", "CONVERT", "COPYCHARA",
    "CSVABL", "CSVBASE", "CSVCALLNAME", "CSVCFLAG", "CSVCSTR", "CSVEQUIP", "CSVEXP",
    "CSVJUEL", "CSVJULE", "CSVMARK", "CSVMASTERNAME", "CSVNAME", "CSVNICKNAME",
    "CSVRELATION", "CSVTALENT", "CUPCHECK", "CURRENTALIGN", "CURRENTREDRAW",
    "CUSTOMDRAWLINE", "CVARSET", "DEBUGCLEAR", "DEBUGPRINT", "DEBUGPRINTFORM",
    "DEBUGPRINTFORML", "DEBUGPRINTL", "DELALLCHARA", "DELCHARA", "DELDATA", "DOTRAIN",
    "DRAWLINE", "DRAWLINEFORM", "DUMPRAND", "ENCODETOUNI", "ENDNOSKIP", "ESCAPE",
    "EXISTCSV", "EXPONENT", "FINDCHARA", "FINDELEMENT", "FINDLASTCHARA", "FINDLASTELEMENT",
    "FIND_CHARADATA", "FONTBOLD", "FONTITALIC", "FONTREGULAR", "FONTSTYLE", "FORCEKANA",
    "FORCEWAIT", "GCLEAR", "GCREATE", "GCREATED", "GCREATEFROMFILE", "GDISPOSE", "GDRAWG",
    "GDRAWGWITHMASK", "GDRAWSPRITE", "GETBGCOLOR", "GETBIT", "GETCHARA", "GETCOLOR",
    "GETCONFIG", "GETCONFIGS", "GETDEFBGCOLOR", "GETDEFCOLOR", "GETEXPLV", "GETFOCUSCOLOR",
    "GETFONT", "GETKEY", "GETKEYTRIGGERED", "GETLINESTR", "GETMILLISECOND", "GETNUM",
    "GETPALAMLV", "GETSECOND", "GETSTYLE", "GETTIME", "GETTIMES", "GFILLRECTANGLE",
    "GGETCOLOR", "GHEIGHT", "GLOAD", "GROUPMATCH", "GSAVE", "GSETBRUSH", "GSETCOLOR",
    "GSETFONT", "GSETPEN", "GWIDTH", "HTML_ESCAPE", "HTML_GETPRINTEDSTR",
    "HTML_POPPRINTINGSTR", "HTML_PRINT", "HTML_TAGSPLIT", "HTML_TOPLAINTEXT", "INITRAND",
    "INPUT", "INPUTMOUSEKEY", "INPUTS", "INRANGE", "INRANGEARRAY", "INRANGECARRAY",
    "INVERTBIT", "ISACTIVE", "ISNUMERIC", "ISSKIP", "LIMIT", "LINEISEMPTY", "LOADCHARA",
    "LOADDATA", "LOADGAME", "LOADGLOBAL", "LOADTEXT", "LOG", "LOG10", "MATCH", "MAX",
    "MAXARRAY", "MAXCARRAY", "MESSKIP", "MIN", "MINARRAY", "MINCARRAY", "MONEYSTR",
    "MOUSESKIP", "MOUSEX", "MOUSEY", "NOSAMES", "NOSKIP", "ONEINPUT", "ONEINPUTS",
    "OUTPUTLOG", "PICKUPCHARA", "POWER", "PRINT", "PRINTBUTTON", "PRINTBUTTONC",
    "PRINTBUTTONLC", "PRINTC", "PRINTCD", "PRINTCK", "PRINTCLENGTH", "PRINTCPERLINE",
    "PRINTD", "PRINTDL", "PRINTDW", "PRINTFORM", "PRINTFORMC", "PRINTFORMCD", "PRINTFORMCK",
    "PRINTFORMD", "PRINTFORMDL", "PRINTFORMDW", "PRINTFORMK", "PRINTFORMKL", "PRINTFORMKW",
    "PRINTFORML", "PRINTFORMLC", "PRINTFORMLCD", "PRINTFORMLCK", "PRINTFORMS",
    "PRINTFORMSD", "PRINTFORMSDL", "PRINTFORMSDW", "PRINTFORMSK", "PRINTFORMSKL",
    "PRINTFORMSKW", "PRINTFORMSL", "PRINTFORMSW", "PRINTFORMW", "PRINTK", "PRINTKL",
    "PRINTKW", "PRINTL", "PRINTLC", "PRINTLCD", "PRINTLCK", "PRINTPLAIN", "PRINTPLAINFORM",
    "PRINTS", "PRINTSD", "PRINTSDL", "PRINTSDW", "PRINTSINGLE", "PRINTSINGLED",
    "PRINTSINGLEFORM", "PRINTSINGLEFORMD", "PRINTSINGLEFORMK", "PRINTSINGLEFORMS",
    "PRINTSINGLEFORMSD", "PRINTSINGLEFORMSK", "PRINTSINGLEK", "PRINTSINGLES",
    "PRINTSINGLESD", "PRINTSINGLESK", "PRINTSINGLEV", "PRINTSINGLEVD", "PRINTSINGLEVK",
    "PRINTSK", "PRINTSKL", "PRINTSKW", "PRINTSL", "PRINTSW", "PRINTV", "PRINTVD",
    "PRINTVDL", "PRINTVDW", "PRINTVK", "PRINTVKL", "PRINTVKW", "PRINTVL", "PRINTVW",
    "PRINTW", "PRINT_ABL", "PRINT_EXP", "PRINT_IMG", "PRINT_ITEM", "PRINT_MARK",
    "PRINT_PALAM", "PRINT_RECT", "PRINT_SHOPITEM", "PRINT_SPACE", "PRINT_TALENT", "PUTFORM",
    "QUIT", "RAND", "RANDOMIZE", "REDRAW", "REPLACE", "RESETBGCOLOR", "RESETCOLOR",
    "RESETDATA", "RESETGLOBAL", "RESET_STAIN", "REUSELASTLINE", "SAVECHARA", "SAVEDATA",
    "SAVEGAME", "SAVEGLOBAL", "SAVENOS", "SAVETEXT", "SETANIMETIMER", "SETBGCOLOR",
    "SETBGCOLORBYNAME", "SETBIT", "SETCOLOR", "SETCOLORBYNAME", "SETFONT", "SIGN",
    "SKIPDISP", "SORTCHARA", "SPLIT", "SPRITEANIMEADDFRAME", "SPRITEANIMECREATE",
    "SPRITECREATE", "SPRITECREATED", "SPRITEDISPOSE", "SPRITEGETCOLOR", "SPRITEHEIGHT",
    "SPRITEMOVE", "SPRITEPOSX", "SPRITEPOSY", "SPRITESETPOS", "SPRITEWIDTH", "SQRT",
    "STOPCALLTRAIN", "STRCOUNT", "STRFIND", "STRFINDU", "STRFORM", "STRLEN", "STRLENFORM",
    "STRLENFORMU", "STRLENS", "STRLENSU", "STRLENU", "SUBSTRING", "SUBSTRINGU", "SUMARRAY",
    "SUMCARRAY", "SWAP", "SWAPCHARA", "TIMES", "TINPUT", "TINPUTS", "TOFULL", "TOHALF",
    "TOINT", "TOLOWER", "TONEINPUT", "TONEINPUTS", "TOOLTIP_SETCOLOR", "TOOLTIP_SETDELAY",
    "TOOLTIP_SETDURATION", "TOSTR", "TOUPPER", "TWAIT", "UNICODE", "UPCHECK", "VARSET",
    "VARSIZE", "WAIT", "WAITANYKEY",
];

/// Built-in variables that may start an assignment line
const BUILTIN_VARIABLES: &[&str] = &[
    "MASTER", "PLAYER", "TARGET", "ASSI", "ABL", "ARG", "ARGS", "ASSIPLAY", "BASE",
    "MAXBASE", "BOUGHT", "CALLNAME", "CDFLAG", "CDOWN", "CFLAG", "COUNT", "CSTR", "CUP",
    "DAY", "DOWN", "DOWNBASE", "EJAC", "EQUIP", "EX", "EXP", "EXPLV", "FLAG", "GLOBAL",
    "GLOBALS", "GOTJUEL", "ISASSI", "ITEM", "ITEMSALES", "JUEL", "LOCAL", "LOCALS",
    "LOSEBASE", "MARK", "MASTERNAME", "MONEY", "NAME", "NEXTCOM", "NICKNAME", "NO",
    "NOITEM", "NOWEX", "PALAM", "PALAMLV", "PBAND", "PREVCOM", "RANDDATA", "RELATION",
    "RESULT", "RESULTS", "SAVEDATA_TEXT", "SAVESTR", "SELECTCOM", "SOURCE", "STAIN", "STR",
    "TALENT", "TCVAR", "TEQUIP", "TFLAG", "TIME", "TSTR", "UP", "WINDOW_TITLE", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "DA", "DB", "DC", "DD", "DE", "DITEMTYPE", "TA",
    "TB",
];

/// `#` attributes that only annotate a function
pub const ATTRIBUTES: &[&str] = &[
    "ONLY",
    "FUNCTION",
    "FUNCTIONS",
    "LOCALSIZE",
    "LOCALSSIZE",
    "LATER",
    "PRI",
];

/// `#` attributes that declare a function-local variable
pub const DECLARATIONS: &[&str] = &["DIM", "DIMS"];

/// Qualifiers allowed between `#DIM` and the declared name
pub const DECLARATION_QUALIFIERS: &[&str] = &["DYNAMIC", "REF", "CONST"];

/// `[...]` special blocks taking no argument
pub const SPECIAL_BLOCKS: &[&str] = &[
    "SKIPSTART",
    "SKIPEND",
    "ELSE",
    "ENDIF",
    "IF_DEBUG",
    "IF_NDEBUG",
];

/// `[...]` special blocks taking one identifier argument
pub const SPECIAL_BLOCKS_WITH_ARG: &[&str] = &["IF", "ELSEIF"];

static KEYWORDS: LazyLock<HashMap<&'static str, LineKind>> = LazyLock::new(|| {
    let mut map =
        HashMap::with_capacity(STATEMENTS.len() + BUILTIN_FUNCTIONS.len() + BUILTIN_VARIABLES.len());
    map.extend(
        BUILTIN_VARIABLES
            .iter()
            .map(|&name| (name, LineKind::Variable)),
    );
    map.extend(
        BUILTIN_FUNCTIONS
            .iter()
            .map(|&name| (name, LineKind::BuiltinFunction)),
    );
    // Statements win over the other tables on a shared spelling
    map.extend(STATEMENTS.iter().copied());
    map
});

/// Look up an uppercased identifier in the keyword tables
#[must_use]
pub fn lookup(upper_ident: &str) -> Option<LineKind> {
    KEYWORDS.get(upper_ident).copied()
}

#[must_use]
pub fn is_attribute(upper_ident: &str) -> bool {
    ATTRIBUTES.contains(&upper_ident)
}

#[must_use]
pub fn is_declaration(upper_ident: &str) -> bool {
    DECLARATIONS.contains(&upper_ident)
}

#[must_use]
pub fn is_declaration_qualifier(upper_ident: &str) -> bool {
    DECLARATION_QUALIFIERS.contains(&upper_ident)
}
