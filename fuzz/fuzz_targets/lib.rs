#[derive(Debug)]
pub enum CacheOperation {
    Save(u8, u8),
    Get(u8),
    GetMut(u8, u8),
    Peek(u8),
    Remove(u8),
    Pop,
    Clear,
    SetCapacity(u8),
    Iter,
    Clone,
}

impl<'a> arbitrary::Arbitrary<'a> for CacheOperation {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        match u.int_in_range(0..=9)? {
            0 => Ok(CacheOperation::Save(u.arbitrary()?, u.arbitrary()?)),
            1 => Ok(CacheOperation::Get(u.arbitrary()?)),
            2 => Ok(CacheOperation::GetMut(u.arbitrary()?, u.arbitrary()?)),
            3 => Ok(CacheOperation::Peek(u.arbitrary()?)),
            4 => Ok(CacheOperation::Remove(u.arbitrary()?)),
            5 => Ok(CacheOperation::Pop),
            6 => Ok(CacheOperation::Clear),
            7 => Ok(CacheOperation::SetCapacity(u.arbitrary()?)),
            8 => Ok(CacheOperation::Iter),
            9 => Ok(CacheOperation::Clone),
            _ => unreachable!(),
        }
    }
}

#[derive(Debug)]
pub enum MapOperation {
    Insert(u8, u8),
    RemoveKey(u8),
    RemoveAt(u8),
    PopFront,
    PopBack,
    Clear,
}

impl<'a> arbitrary::Arbitrary<'a> for MapOperation {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        match u.int_in_range(0..=5)? {
            0 => Ok(MapOperation::Insert(u.arbitrary()?, u.arbitrary()?)),
            1 => Ok(MapOperation::RemoveKey(u.arbitrary()?)),
            2 => Ok(MapOperation::RemoveAt(u.arbitrary()?)),
            3 => Ok(MapOperation::PopFront),
            4 => Ok(MapOperation::PopBack),
            5 => Ok(MapOperation::Clear),
            _ => unreachable!(),
        }
    }
}
