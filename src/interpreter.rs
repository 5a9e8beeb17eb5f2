use crate::ast::{BinaryOp, Declaration, DynamicNode, StaticNode};
use crate::error::VersoError;
use crate::value::{PrimType, Value};
use crate::version::{Version, VersionBundle};
use std::collections::HashMap;

/// One name-to-value association. The type tag is fixed at declaration;
/// the value stays empty until the binding is first written.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub mutable: bool,
    pub ty: PrimType,
    pub value: Option<Value>,
}

/// Flat, single-scope binding environment. One environment flows through a
/// program; each statement consumes the current environment and yields the
/// next, so a failing statement leaves the previous environment intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-declaring an existing name overwrites it.
    pub fn declare(&mut self, name: &str, mutable: bool, ty: PrimType) {
        self.bindings.insert(
            name.to_string(),
            Binding {
                mutable,
                ty,
                value: None,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// First write after a declaration. Allowed regardless of mutability;
    /// the value's tag must equal the declared tag.
    pub fn initialize(&mut self, name: &str, value: Value) -> Result<(), VersoError> {
        let Some(binding) = self.bindings.get_mut(name) else {
            return Err(VersoError::reference_error(format!(
                "Undefined variable '{}'",
                name
            )));
        };
        if binding.ty != value.prim_type() {
            return Err(VersoError::type_error(format!(
                "Type mismatch for '{}': expected {}, found {}",
                name,
                binding.ty,
                value.type_name()
            )));
        }
        binding.value = Some(value);
        Ok(())
    }

    /// Write to an existing binding: it must exist, be mutable, and keep
    /// its declared tag.
    pub fn reassign(&mut self, name: &str, value: Value) -> Result<(), VersoError> {
        let Some(binding) = self.bindings.get_mut(name) else {
            return Err(VersoError::reference_error(format!(
                "Undefined variable '{}'",
                name
            )));
        };
        if !binding.mutable {
            return Err(VersoError::type_error(format!(
                "Cannot reassign immutable variable '{}'",
                name
            )));
        }
        if binding.ty != value.prim_type() {
            return Err(VersoError::type_error(format!(
                "Type mismatch for '{}': expected {}, found {}",
                name,
                binding.ty,
                value.type_name()
            )));
        }
        binding.value = Some(value);
        Ok(())
    }
}

/// Version-configured tree walker. Pulls static nodes lazily and yields
/// output lines; each `next` call pumps statements until a line is
/// produced, input runs out, or an error surfaces. Output produced before
/// a failing statement remains observable; the iterator fuses on error.
pub struct Interpreter<I> {
    nodes: I,
    environment: Environment,
    version: Version,
    allowed_types: Vec<PrimType>,
    failed: bool,
}

impl<I> Interpreter<I>
where
    I: Iterator<Item = Result<StaticNode, VersoError>>,
{
    pub fn new(nodes: I, bundle: &VersionBundle) -> Self {
        Self::with_environment(nodes, bundle, Environment::new())
    }

    pub fn with_environment(nodes: I, bundle: &VersionBundle, environment: Environment) -> Self {
        Self {
            nodes,
            environment,
            version: bundle.version(),
            allowed_types: bundle.allowed_types(),
            failed: false,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_environment(self) -> Environment {
        self.environment
    }

    /// Drive the whole program, collecting its output lines in order.
    pub fn run(&mut self) -> Result<Vec<String>, VersoError> {
        let mut lines = Vec::new();
        while let Some(item) = self.next() {
            lines.push(item?);
        }
        Ok(lines)
    }

    fn execute_statement(&mut self, node: &StaticNode) -> Result<Option<String>, VersoError> {
        let mut environment = self.environment.clone();
        let output = match node {
            StaticNode::Declaration(declaration) => {
                self.declare(&mut environment, declaration)?;
                None
            }
            StaticNode::Assignation { declaration, value } => {
                self.declare(&mut environment, declaration)?;
                let result = evaluate(value, &environment)?;
                environment.initialize(&declaration.name, result)?;
                None
            }
            StaticNode::Expression { variable, value } => {
                // Existence and mutability are checked before the
                // right-hand side is evaluated
                let Some(binding) = environment.get(variable) else {
                    return Err(VersoError::reference_error(format!(
                        "Undefined variable '{}'",
                        variable
                    )));
                };
                if !binding.mutable {
                    return Err(VersoError::type_error(format!(
                        "Cannot reassign immutable variable '{}'",
                        variable
                    )));
                }
                let result = evaluate(value, &environment)?;
                environment.reassign(variable, result)?;
                None
            }
            StaticNode::PrintLn { argument } => {
                Some(evaluate(argument, &environment)?.to_string())
            }
        };
        self.environment = environment;
        Ok(output)
    }

    fn declare(
        &self,
        environment: &mut Environment,
        declaration: &Declaration,
    ) -> Result<(), VersoError> {
        // Reachable only through a hand-built AST; parsed programs cannot
        // name a type their version's lexer does not know
        if !self.allowed_types.contains(&declaration.ty) {
            return Err(VersoError::type_error(format!(
                "Type {} is not available in version {}",
                declaration.ty, self.version
            )));
        }
        environment.declare(
            &declaration.name,
            declaration.modifier.mutable,
            declaration.ty,
        );
        Ok(())
    }
}

impl<I> Iterator for Interpreter<I>
where
    I: Iterator<Item = Result<StaticNode, VersoError>>,
{
    type Item = Result<String, VersoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let node = match self.nodes.next() {
                None => return None,
                Some(Err(error)) => {
                    self.failed = true;
                    return Some(Err(error));
                }
                Some(Ok(node)) => node,
            };
            match self.execute_statement(&node) {
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
                Ok(Some(line)) => return Some(Ok(line)),
                Ok(None) => continue,
            }
        }
    }
}

/// Evaluate an expression tree against the environment. Pure: the same
/// node and environment always produce the same value.
pub fn evaluate(node: &DynamicNode, environment: &Environment) -> Result<Value, VersoError> {
    match node {
        DynamicNode::Literal(value) => Ok(value.clone()),
        DynamicNode::Variable(name) => match environment.get(name) {
            None => Err(VersoError::reference_error(format!(
                "Undefined variable '{}'",
                name
            ))),
            Some(Binding { value: None, .. }) => Err(VersoError::reference_error(format!(
                "Variable '{}' is declared but has no value",
                name
            ))),
            Some(Binding {
                value: Some(value), ..
            }) => Ok(value.clone()),
        },
        DynamicNode::Binary { op, left, right } => {
            let left = evaluate(left, environment)?;
            let right = evaluate(right, environment)?;
            apply_binary(*op, left, right)
        }
    }
}

fn apply_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, VersoError> {
    match op {
        BinaryOp::Sum => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::Boolean(_), right) => Err(VersoError::type_error(format!(
                "Cannot apply '+' to Boolean and {}",
                right.type_name()
            ))),
            (left, Value::Boolean(_)) => Err(VersoError::type_error(format!(
                "Cannot apply '+' to {} and Boolean",
                left.type_name()
            ))),
            // At least one operand is a String: concatenate, numbers
            // rendered the same way println renders them
            (left, right) => Ok(Value::String(format!("{}{}", left, right))),
        },
        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
            let (l, r) = match (&left, &right) {
                (Value::Number(l), Value::Number(r)) => (*l, *r),
                _ => {
                    let offender = if !matches!(left, Value::Number(_)) {
                        left.type_name()
                    } else {
                        right.type_name()
                    };
                    return Err(VersoError::type_error(format!(
                        "Cannot apply '{}' to {}: both operands must be Number",
                        op.symbol(),
                        offender
                    )));
                }
            };
            match op {
                BinaryOp::Subtract => Ok(Value::Number(l - r)),
                BinaryOp::Multiply => Ok(Value::Number(l * r)),
                BinaryOp::Divide => {
                    if r == 0.0 {
                        Err(VersoError::arithmetic_error("Division by zero".to_string()))
                    } else {
                        Ok(Value::Number(l / r))
                    }
                }
                BinaryOp::Sum => unreachable!(),
            }
        }
    }
}
