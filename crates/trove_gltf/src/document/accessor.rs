//! Accessor component and element layout.

pub use gltf::accessor::{DataType, Dimensions};

/// Whether the component type is an integer type.
pub fn is_integer(component: DataType) -> bool {
    component != DataType::F32
}

/// Whether the component type is a signed integer type.
pub fn is_signed_integer(component: DataType) -> bool {
    matches!(component, DataType::I8 | DataType::I16)
}

/// Memory layout of one accessor element.
pub trait ElementLayout {
    /// Number of matrix columns, 1 for scalars and vectors.
    fn columns(self) -> usize;

    /// Number of components per column.
    fn rows(self) -> usize;

    fn is_matrix(self) -> bool;

    /// Size of one element in bytes.
    ///
    /// Matrix columns start on 4-byte boundaries, so byte and short matrices
    /// carry padding at the end of each column.
    fn byte_size(self, component: DataType) -> usize;
}

impl ElementLayout for Dimensions {
    fn columns(self) -> usize {
        match self {
            Dimensions::Mat2 => 2,
            Dimensions::Mat3 => 3,
            Dimensions::Mat4 => 4,
            _ => 1,
        }
    }

    fn rows(self) -> usize {
        self.multiplicity() / self.columns()
    }

    fn is_matrix(self) -> bool {
        self.columns() > 1
    }

    fn byte_size(self, component: DataType) -> usize {
        let column = self.rows() * component.size();
        if self.is_matrix() {
            column.next_multiple_of(4) * self.columns()
        } else {
            column
        }
    }
}
