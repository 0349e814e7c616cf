use crate::runtime::value::Value;

/// Fixed-width numeric array. Classified as a sequence like `Value::Array`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl TypedArray {
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Int8(v) => v.len(),
            TypedArray::Int16(v) => v.len(),
            TypedArray::Int32(v) => v.len(),
            TypedArray::Float32(v) => v.len(),
            TypedArray::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            TypedArray::Int8(v) => v.get(index).map(|x| Value::Integer(i64::from(*x))),
            TypedArray::Int16(v) => v.get(index).map(|x| Value::Integer(i64::from(*x))),
            TypedArray::Int32(v) => v.get(index).map(|x| Value::Integer(i64::from(*x))),
            TypedArray::Float32(v) => v.get(index).map(|x| Value::Float(f64::from(*x))),
            TypedArray::Float64(v) => v.get(index).map(|x| Value::Float(*x)),
        }
    }

    /// Widens every element into a plain `Value`.
    pub fn to_values(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TypedArray::Int8(_) => "Int8Array",
            TypedArray::Int16(_) => "Int16Array",
            TypedArray::Int32(_) => "Int32Array",
            TypedArray::Float32(_) => "Float32Array",
            TypedArray::Float64(_) => "Float64Array",
        }
    }
}
