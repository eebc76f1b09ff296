use std::fmt;

/// First register of the working window expressions evaluate in.
pub const REG_MIN: u8 = 8;
/// Last register of the working window.
pub const REG_MAX: u8 = 23;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reg(pub u8);

impl Reg {
    /// Hardwired zero register.
    pub const ZERO: Reg = Reg(0);
    /// Frame pointer.
    pub const FP: Reg = Reg(25);
    /// Stack pointer.
    pub const SP: Reg = Reg(29);
    /// Return address register, written by `jal`.
    pub const RA: Reg = Reg(31);
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Third operand of the arithmetic instructions: a register or an
/// immediate the assembler folds into the immediate instruction form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Reg(Reg),
    Imm(i32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{}", r),
            Operand::Imm(i) => write!(f, "{}", i),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    Import(String),
    Code,
    Align(u32),
    Export(String),
    Label(String),
    Blank,

    Add(Reg, Reg, Operand),
    Sub(Reg, Reg, Operand),
    Mul(Reg, Reg, Operand),
    Div(Reg, Reg, Operand),

    Ldw(Reg, Reg, i32),
    Stw(Reg, Reg, i32),

    Beq(Reg, Reg, String),
    Bne(Reg, Reg, String),
    Blt(Reg, Reg, String),
    Ble(Reg, Reg, String),
    Bgt(Reg, Reg, String),
    Bge(Reg, Reg, String),
    /// Unsigned compare-and-branch; one instruction covers both the
    /// negative-index and the too-large-index halves of a bounds check.
    Bgeu(Reg, Reg, String),

    J(String),
    Jal(String),
    Jr(Reg),
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Inst::*;
        match self {
            Import(sym) => write!(f, "\t.import\t{}", sym),
            Code => write!(f, "\t.code"),
            Align(n) => write!(f, "\t.align\t{}", n),
            Export(sym) => write!(f, "\t.export\t{}", sym),
            Label(lbl) => write!(f, "{}:", lbl),
            Blank => Ok(()),

            Add(d, a, b) => write!(f, "\tadd\t{},{},{}", d, a, b),
            Sub(d, a, b) => write!(f, "\tsub\t{},{},{}", d, a, b),
            Mul(d, a, b) => write!(f, "\tmul\t{},{},{}", d, a, b),
            Div(d, a, b) => write!(f, "\tdiv\t{},{},{}", d, a, b),

            Ldw(d, a, off) => write!(f, "\tldw\t{},{},{}", d, a, off),
            Stw(s, a, off) => write!(f, "\tstw\t{},{},{}", s, a, off),

            Beq(a, b, lbl) => write!(f, "\tbeq\t{},{},{}", a, b, lbl),
            Bne(a, b, lbl) => write!(f, "\tbne\t{},{},{}", a, b, lbl),
            Blt(a, b, lbl) => write!(f, "\tblt\t{},{},{}", a, b, lbl),
            Ble(a, b, lbl) => write!(f, "\tble\t{},{},{}", a, b, lbl),
            Bgt(a, b, lbl) => write!(f, "\tbgt\t{},{},{}", a, b, lbl),
            Bge(a, b, lbl) => write!(f, "\tbge\t{},{},{}", a, b, lbl),
            Bgeu(a, b, lbl) => write!(f, "\tbgeu\t{},{},{}", a, b, lbl),

            J(lbl) => write!(f, "\tj\t{}", lbl),
            Jal(lbl) => write!(f, "\tjal\t{}", lbl),
            Jr(r) => write!(f, "\tjr\t{}", r),
        }
    }
}
