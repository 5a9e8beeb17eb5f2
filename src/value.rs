use std::fmt;

/// Type tag recorded at declaration time. A binding's tag never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimType {
    Number,
    String,
    Boolean,
}

impl PrimType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimType::Number => "Number",
            PrimType::String => "String",
            PrimType::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for PrimType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Value {
    pub fn prim_type(&self) -> PrimType {
        match self {
            Value::Number(_) => PrimType::Number,
            Value::String(_) => PrimType::String,
            Value::Boolean(_) => PrimType::Boolean,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.prim_type().name()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // Whole values print without a trailing ".0"
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}
