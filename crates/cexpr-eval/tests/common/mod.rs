//! Test host shared by the integration tests.
//!
//! `MockInstance` owns a tiny heap with explicit root counts. When
//! `collect_on_alloc` is set, every allocation first frees every object with
//! no roots, which makes a missing keep-alive root show up as a
//! use-after-free panic.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cexpr_eval::{FieldValue, Instance, ModuleInfo, ObjectRef};
use wasm_encoder::{Encode, Instruction};

// ══════════════════════════════════════════════════════════════════════════════
// Encoding
// ══════════════════════════════════════════════════════════════════════════════

/// Encode `instrs` followed by `end`.
pub fn expr(instrs: &[Instruction<'_>]) -> Vec<u8> {
    let mut sink = Vec::new();
    for instr in instrs {
        instr.encode(&mut sink);
    }
    Instruction::End.encode(&mut sink);
    sink
}

// ══════════════════════════════════════════════════════════════════════════════
// Heap
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Struct { type_index: u32, fields: Vec<FieldValue> },
    Array { type_index: u32, elements: Vec<FieldValue> },
    Function(u32),
}

#[derive(Debug, Default)]
pub struct Heap {
    objects: HashMap<u64, Object>,
    roots: HashMap<u64, usize>,
    next_handle: u64,
    pub collections: usize,
    pub collected: usize,
}

impl Heap {
    fn collect(&mut self) {
        let roots = &self.roots;
        let before = self.objects.len();
        self.objects.retain(|handle, _| roots.contains_key(handle));
        self.collections += 1;
        self.collected += before - self.objects.len();
    }

    fn object_mut(&mut self, object: ObjectRef) -> &mut Object {
        self.objects
            .get_mut(&object.bits())
            .unwrap_or_else(|| panic!("use after free: {object} was collected"))
    }
}

/// Root guard; decrements the root count when dropped.
pub struct MockRoot {
    heap: Rc<RefCell<Heap>>,
    handle: u64,
}

impl Drop for MockRoot {
    fn drop(&mut self) {
        let mut heap = self.heap.borrow_mut();
        if let Some(count) = heap.roots.get_mut(&self.handle) {
            *count -= 1;
            if *count == 0 {
                heap.roots.remove(&self.handle);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Instance
// ══════════════════════════════════════════════════════════════════════════════

pub struct MockInstance {
    heap: Rc<RefCell<Heap>>,
    globals: HashMap<u32, u64>,
    v128_globals: HashMap<u32, u128>,
    /// Per struct type, whether each field is v128.
    struct_layouts: HashMap<u32, Vec<bool>>,
    /// Per array type, whether the element is v128.
    array_layouts: HashMap<u32, bool>,
    wrappers: HashMap<u32, ObjectRef>,
    /// Allocations that succeed before the host reports out-of-memory.
    pub fail_after: Option<usize>,
    pub allocations: usize,
    pub collect_on_alloc: bool,
    pub internalized: Vec<u64>,
}

impl MockInstance {
    pub fn new(info: &ModuleInfo) -> Self {
        let mut struct_layouts = HashMap::new();
        let mut array_layouts = HashMap::new();
        for (index, ty) in info.types.iter().enumerate() {
            if let Some(fields) = ty.struct_fields() {
                struct_layouts.insert(index as u32, fields.iter().map(|f| f.storage.is_v128()).collect());
            }
            if let Some(element) = ty.array_element() {
                array_layouts.insert(index as u32, element.storage.is_v128());
            }
        }
        Self {
            heap: Rc::new(RefCell::new(Heap {
                next_handle: 0x10,
                ..Heap::default()
            })),
            globals: HashMap::new(),
            v128_globals: HashMap::new(),
            struct_layouts,
            array_layouts,
            wrappers: HashMap::new(),
            fail_after: None,
            allocations: 0,
            collect_on_alloc: false,
            internalized: Vec::new(),
        }
    }

    pub fn with_global(mut self, index: u32, bits: u64) -> Self {
        self.globals.insert(index, bits);
        self
    }

    pub fn with_v128_global(mut self, index: u32, bits: u128) -> Self {
        self.v128_globals.insert(index, bits);
        self
    }

    pub fn object(&self, bits: u64) -> Option<Object> {
        self.heap.borrow().objects.get(&bits).cloned()
    }

    pub fn live_objects(&self) -> usize {
        self.heap.borrow().objects.len()
    }

    pub fn rooted(&self) -> usize {
        self.heap.borrow().roots.values().sum()
    }

    pub fn collected(&self) -> usize {
        self.heap.borrow().collected
    }

    pub fn collect_now(&self) {
        self.heap.borrow_mut().collect();
    }

    fn allocate(&mut self, object: Object) -> Option<ObjectRef> {
        if self.fail_after.is_some_and(|limit| self.allocations >= limit) {
            return None;
        }
        self.allocations += 1;
        let mut heap = self.heap.borrow_mut();
        if self.collect_on_alloc {
            heap.collect();
        }
        let handle = heap.next_handle;
        heap.next_handle += 0x10;
        heap.objects.insert(handle, object);
        ObjectRef::new(handle)
    }

    fn check_width(is_v128: bool, value: FieldValue) {
        match (is_v128, value) {
            (true, FieldValue::Vector(_)) | (false, FieldValue::Scalar(_)) => {}
            _ => panic!("storage width mismatch: slot is_v128={is_v128}, value {value:?}"),
        }
    }
}

impl Instance for MockInstance {
    type Root = MockRoot;

    fn load_global(&self, index: u32) -> u64 {
        self.globals.get(&index).copied().unwrap_or(0)
    }

    fn load_v128_global(&self, index: u32) -> u128 {
        self.v128_globals.get(&index).copied().unwrap_or(0)
    }

    fn struct_new_default(&mut self, type_index: u32) -> Option<ObjectRef> {
        let fields = self.struct_layouts[&type_index]
            .iter()
            .map(|&v128| if v128 { FieldValue::Vector(0) } else { FieldValue::Scalar(0) })
            .collect();
        self.allocate(Object::Struct { type_index, fields })
    }

    fn struct_set(&mut self, object: ObjectRef, field: u32, value: FieldValue) {
        let mut heap = self.heap.borrow_mut();
        match heap.object_mut(object) {
            Object::Struct { type_index, fields } => {
                let ty = *type_index;
                Self::check_width(self.struct_layouts[&ty][field as usize], value);
                fields[field as usize] = value;
            }
            other => panic!("struct_set on {other:?}"),
        }
    }

    fn array_new(&mut self, type_index: u32, len: u32, init: FieldValue) -> Option<ObjectRef> {
        Self::check_width(self.array_layouts[&type_index], init);
        self.allocate(Object::Array {
            type_index,
            elements: vec![init; len as usize],
        })
    }

    fn array_set(&mut self, object: ObjectRef, index: u32, value: FieldValue) {
        let mut heap = self.heap.borrow_mut();
        match heap.object_mut(object) {
            Object::Array { type_index, elements } => {
                let ty = *type_index;
                Self::check_width(self.array_layouts[&ty], value);
                elements[index as usize] = value;
            }
            other => panic!("array_set on {other:?}"),
        }
    }

    fn function_wrapper(&mut self, index: u32) -> ObjectRef {
        if let Some(&wrapper) = self.wrappers.get(&index) {
            if self.heap.borrow().objects.contains_key(&wrapper.bits()) {
                return wrapper;
            }
        }
        let saved = self.fail_after.take();
        let wrapper = self
            .allocate(Object::Function(index))
            .expect("handles are non-zero");
        self.fail_after = saved;
        self.wrappers.insert(index, wrapper);
        wrapper
    }

    fn extern_internalize(&mut self, bits: u64) -> u64 {
        self.internalized.push(bits);
        bits
    }

    fn root(&mut self, object: ObjectRef) -> MockRoot {
        *self.heap.borrow_mut().roots.entry(object.bits()).or_insert(0) += 1;
        MockRoot {
            heap: Rc::clone(&self.heap),
            handle: object.bits(),
        }
    }
}
