use crate::runtime::builtin_function::BuiltinFunction;

pub mod collection_ops;
mod helpers;
pub mod higher_order;
pub mod list_ops;
pub mod set_ops;
pub mod type_check;

use collection_ops::{
    builtin_access, builtin_copy, builtin_items, builtin_keys, builtin_merge, builtin_offset,
    builtin_pairs, builtin_values,
};
use higher_order::{
    builtin_cmp, builtin_filter, builtin_foldl, builtin_greater, builtin_map, builtin_reduce,
    builtin_smaller, builtin_sorted,
};
use list_ops::{
    builtin_add, builtin_find, builtin_find_like, builtin_find_one_of, builtin_first,
    builtin_insert, builtin_is_in, builtin_last, builtin_remove, builtin_remove_at,
    builtin_reverse, builtin_slice,
};
use set_ops::{
    builtin_as_map, builtin_couples_as_map, builtin_difference, builtin_intersection,
    builtin_items_as_map, builtin_union,
};
use type_check::{
    builtin_is_defined, builtin_is_function, builtin_is_instance, builtin_is_iterable,
    builtin_is_list, builtin_is_map, builtin_is_number, builtin_is_object, builtin_is_string,
    builtin_is_undefined, builtin_kind_of, builtin_len, builtin_type_of,
};

/// Every named builtin, grouped by concern.
pub static BUILTINS: &[BuiltinFunction] = &[
    BuiltinFunction {
        name: "len",
        func: builtin_len,
    },
    BuiltinFunction {
        name: "type_of",
        func: builtin_type_of,
    },
    BuiltinFunction {
        name: "kind_of",
        func: builtin_kind_of,
    },
    BuiltinFunction {
        name: "is_list",
        func: builtin_is_list,
    },
    BuiltinFunction {
        name: "is_map",
        func: builtin_is_map,
    },
    BuiltinFunction {
        name: "is_iterable",
        func: builtin_is_iterable,
    },
    BuiltinFunction {
        name: "is_function",
        func: builtin_is_function,
    },
    BuiltinFunction {
        name: "is_instance",
        func: builtin_is_instance,
    },
    BuiltinFunction {
        name: "is_defined",
        func: builtin_is_defined,
    },
    BuiltinFunction {
        name: "is_undefined",
        func: builtin_is_undefined,
    },
    BuiltinFunction {
        name: "is_number",
        func: builtin_is_number,
    },
    BuiltinFunction {
        name: "is_string",
        func: builtin_is_string,
    },
    BuiltinFunction {
        name: "is_object",
        func: builtin_is_object,
    },
    BuiltinFunction {
        name: "keys",
        func: builtin_keys,
    },
    BuiltinFunction {
        name: "values",
        func: builtin_values,
    },
    BuiltinFunction {
        name: "items",
        func: builtin_items,
    },
    BuiltinFunction {
        name: "pairs",
        func: builtin_pairs,
    },
    BuiltinFunction {
        name: "access",
        func: builtin_access,
    },
    BuiltinFunction {
        name: "offset",
        func: builtin_offset,
    },
    BuiltinFunction {
        name: "copy",
        func: builtin_copy,
    },
    BuiltinFunction {
        name: "merge",
        func: builtin_merge,
    },
    BuiltinFunction {
        name: "find",
        func: builtin_find,
    },
    BuiltinFunction {
        name: "find_like",
        func: builtin_find_like,
    },
    BuiltinFunction {
        name: "find_one_of",
        func: builtin_find_one_of,
    },
    BuiltinFunction {
        name: "first",
        func: builtin_first,
    },
    BuiltinFunction {
        name: "last",
        func: builtin_last,
    },
    BuiltinFunction {
        name: "insert",
        func: builtin_insert,
    },
    BuiltinFunction {
        name: "add",
        func: builtin_add,
    },
    BuiltinFunction {
        name: "remove",
        func: builtin_remove,
    },
    BuiltinFunction {
        name: "remove_at",
        func: builtin_remove_at,
    },
    BuiltinFunction {
        name: "slice",
        func: builtin_slice,
    },
    BuiltinFunction {
        name: "reverse",
        func: builtin_reverse,
    },
    BuiltinFunction {
        name: "is_in",
        func: builtin_is_in,
    },
    BuiltinFunction {
        name: "difference",
        func: builtin_difference,
    },
    BuiltinFunction {
        name: "union",
        func: builtin_union,
    },
    BuiltinFunction {
        name: "intersection",
        func: builtin_intersection,
    },
    BuiltinFunction {
        name: "as_map",
        func: builtin_as_map,
    },
    BuiltinFunction {
        name: "couples_as_map",
        func: builtin_couples_as_map,
    },
    BuiltinFunction {
        name: "items_as_map",
        func: builtin_items_as_map,
    },
    BuiltinFunction {
        name: "map",
        func: builtin_map,
    },
    BuiltinFunction {
        name: "filter",
        func: builtin_filter,
    },
    BuiltinFunction {
        name: "reduce",
        func: builtin_reduce,
    },
    BuiltinFunction {
        name: "foldl",
        func: builtin_foldl,
    },
    BuiltinFunction {
        name: "cmp",
        func: builtin_cmp,
    },
    BuiltinFunction {
        name: "greater",
        func: builtin_greater,
    },
    BuiltinFunction {
        name: "smaller",
        func: builtin_smaller,
    },
    BuiltinFunction {
        name: "sorted",
        func: builtin_sorted,
    },
];

pub fn get_builtin(name: &str) -> Option<&'static BuiltinFunction> {
    BUILTINS.iter().find(|b| b.name == name)
}

#[cfg(test)]
mod collection_ops_test;
#[cfg(test)]
mod higher_order_test;
