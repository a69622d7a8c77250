use cgmath::{InnerSpace, Matrix4, Vector3, Vector4};

/// A unit cube centred on the origin, one quad per face, outward CCW winding.
pub const CUBE_OBJ: &str = "\
o cube
v  0.5 -0.5  0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v  0.5  0.5  0.5
v -0.5 -0.5 -0.5
v -0.5 -0.5  0.5
v -0.5  0.5  0.5
v -0.5  0.5 -0.5
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn  1 0 0
vn -1 0 0
vn  0 1 0
vn  0 -1 0
vn  0 0 1
vn  0 0 -1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
f 5/1/2 6/2/2 7/3/2
f 5/1/2 7/3/2 8/4/2
f 7/1/3 4/2/3 3/3/3
f 7/1/3 3/3/3 8/4/3
f 5/1/4 2/2/4 1/3/4
f 5/1/4 1/3/4 6/4/4
f 6/1/5 1/2/5 4/3/5
f 6/1/5 4/3/5 7/4/5
f 2/1/6 5/2/6 8/3/6
f 2/1/6 8/3/6 3/4/6
";

/// A single triangle whose texture coordinates all coincide.
pub const DEGENERATE_UV_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.5 0.5
vn 0 0 1
f 1/1/1 2/1/1 3/1/1
";

pub const EPSILON: f32 = 1e-4;

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn approx_vec(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    (a - b).magnitude() < EPSILON
}

pub fn is_finite(m: &Matrix4<f32>) -> bool {
    let cols: [Vector4<f32>; 4] = [m.x, m.y, m.z, m.w];
    cols.iter().all(|c| c.x.is_finite() && c.y.is_finite() && c.z.is_finite() && c.w.is_finite())
}

/// Apply `m` to a point and return the translated xyz.
pub fn transform_point(m: &Matrix4<f32>, p: Vector3<f32>) -> Vector3<f32> {
    let v = m * p.extend(1.0);
    Vector3::new(v.x, v.y, v.z)
}

/// Pack a glTF JSON document and its binary buffer into a `.glb` container.
pub fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + 8 + bin.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x004E_4942u32.to_le_bytes());
    out.extend_from_slice(&bin);
    out
}

/// One triangle in the XY plane facing +Z, optionally with a TANGENT
/// attribute of `(1, 0, 0, -1)`.
pub fn triangle_glb(with_tangents: bool) -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let normals: [f32; 9] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    let uvs: [f32; 6] = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0];
    let tangents: [f32; 12] = [1.0, 0.0, 0.0, -1.0, 1.0, 0.0, 0.0, -1.0, 1.0, 0.0, 0.0, -1.0];
    let indices: [u16; 3] = [0, 1, 2];

    let mut bin: Vec<u8> = Vec::new();
    bin.extend_from_slice(bytemuck::cast_slice(&positions));
    bin.extend_from_slice(bytemuck::cast_slice(&normals));
    bin.extend_from_slice(bytemuck::cast_slice(&uvs));
    let tangent_offset = bin.len();
    if with_tangents {
        bin.extend_from_slice(bytemuck::cast_slice(&tangents));
    }
    let index_offset = bin.len();
    bin.extend_from_slice(bytemuck::cast_slice(&indices));

    let (tangent_attribute, tangent_view, tangent_accessor, index_id) = if with_tangents {
        (
            r#","TANGENT":3"#.to_string(),
            format!(r#",{{"buffer":0,"byteOffset":{tangent_offset},"byteLength":48}}"#),
            r#",{"bufferView":3,"componentType":5126,"count":3,"type":"VEC4"}"#.to_string(),
            4,
        )
    } else {
        (String::new(), String::new(), String::new(), 3)
    };

    let json = format!(
        r#"{{
"asset":{{"version":"2.0"}},
"buffers":[{{"byteLength":{buffer_len}}}],
"bufferViews":[
{{"buffer":0,"byteOffset":0,"byteLength":36}},
{{"buffer":0,"byteOffset":36,"byteLength":36}},
{{"buffer":0,"byteOffset":72,"byteLength":24}}{tangent_view},
{{"buffer":0,"byteOffset":{index_offset},"byteLength":6}}
],
"accessors":[
{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},
{{"bufferView":1,"componentType":5126,"count":3,"type":"VEC3"}},
{{"bufferView":2,"componentType":5126,"count":3,"type":"VEC2"}}{tangent_accessor},
{{"bufferView":{index_id},"componentType":5123,"count":3,"type":"SCALAR"}}
],
"meshes":[{{"name":"tri","primitives":[{{"attributes":{{"POSITION":0,"NORMAL":1,"TEXCOORD_0":2{tangent_attribute}}},"indices":{index_id}}}]}}]
}}"#,
        buffer_len = bin.len(),
    );
    glb(&json, &bin)
}
