use nom::{
    bytes::streaming::{tag, take},
    combinator::map_opt,
    number::{complete, streaming::le_i16, streaming::le_u32, streaming::le_u8},
    sequence::tuple,
    Err, IResult,
};

use crate::{Frame, DATA_LEN_WITHOUT_VALUE, START_BYTE};

type NomError<'a> = nom::error::Error<&'a [u8]>;

pub type ParseError<'a> = Err<NomError<'a>>;

fn tag_start(i: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&[START_BYTE][..])(i)
}

/// Declared data length, which must at least cover the object selectors.
fn data_len(i: &[u8]) -> IResult<&[u8], usize> {
    map_opt(le_i16, |len: i16| {
        usize::try_from(len)
            .ok()
            .filter(|len| *len >= DATA_LEN_WITHOUT_VALUE)
    })(i)
}

fn data_fields(i: &[u8]) -> IResult<&[u8], (u8, u8, u16, u32, u16)> {
    tuple((
        complete::le_u8,
        complete::le_u8,
        complete::le_u16,
        complete::le_u32,
        complete::le_u16,
    ))(i)
}

pub fn parse_frame(i: &[u8]) -> IResult<&[u8], Frame<'_>> {
    let (i, (_, flags, source, destination, data_len, _)) =
        tuple((tag_start, le_u8, le_u32, le_u32, data_len, take(2usize)))(i)?;

    // data section followed by its checksum
    let (i, data) = take::<_, _, NomError<'_>>(data_len + 2)(i)?;
    let (rest, (data_flags, service, object_type, object_id, property_id)) = data_fields(data)?;

    let frame = Frame {
        flags,
        source,
        destination,
        data_flags,
        service,
        object_type,
        object_id,
        property_id,
        value: &rest[..rest.len() - 2],
    };

    Ok((i, frame))
}
