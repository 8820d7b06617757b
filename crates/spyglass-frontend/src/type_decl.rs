// type_decl.rs
//
// Partial type specification accumulated while parsing a type-id: the
// typename parts (`["unsigned", "long"]`, `["ns::Foo<int>"]`) and the
// trailing pointer/reference declarators.

use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtrOperator {
    Pointer,
    Reference,
}

#[derive(Debug, Clone, Default)]
pub struct TypeDeclaration {
    /// One element per type specifier: a fundamental-type keyword spelling,
    /// or a whole qualified user-defined name.
    pub typenames: Vec<String>,
    pub ptr_operators: SmallVec<[PtrOperator; 4]>,
}

impl TypeDeclaration {
    /// A declaration is usable once at least one type specifier was parsed.
    pub fn is_valid(&self) -> bool {
        !self.typenames.is_empty()
    }

    /// The canonical base name handed to the symbol resolver. Multi-token
    /// spellings collapse their `int` the way the debugger names types:
    /// `short int` is `short`, `long int` is `long`. Only the first adjacent
    /// pair collapses, which also turns `long long int` into `long long`.
    pub fn base_name(&self) -> String {
        let mut parts: Vec<&str> = self.typenames.iter().map(String::as_str).collect();
        for head in ["short", "long"] {
            let pair = parts
                .windows(2)
                .position(|w| w[0] == head && w[1] == "int");
            if let Some(at) = pair {
                parts.remove(at + 1);
            }
        }
        parts.join(" ")
    }

    /// Full name including declarators, e.g. `unsigned long **` — pointer
    /// operators are separated from the base name with a single space.
    pub fn name(&self) -> String {
        let mut name = self.base_name();
        if !self.ptr_operators.is_empty() {
            name.push(' ');
        }
        for op in &self.ptr_operators {
            name.push(match op {
                PtrOperator::Pointer => '*',
                PtrOperator::Reference => '&',
            });
        }
        name
    }
}
