// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reader and writer benchmarks on a generated model

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ifc_step_model::ModelWriter;
use ifc_step_parser::{StepReader, StepWriter};
use std::fmt::Write;

/// A storey holding `walls` walls, each with its own placement
fn generated_file(walls: u32) -> String {
    let mut text = String::from(
        "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION((''),'2;1');\n\
         FILE_NAME('bench.ifc','',(''),(''),'','','');\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n\
         #1=IFCCARTESIANPOINT((0.,0.,0.));\n#2=IFCAXIS2PLACEMENT3D(#1,$,$);\n\
         #3=IFCLOCALPLACEMENT($,#2);\n\
         #4=IFCBUILDINGSTOREY('0YvctVUKr0kugbFTf53O9L',$,'Level',$,$,#3,$,$,.ELEMENT.,0.);\n",
    );
    let mut contained = Vec::new();
    for i in 0..walls {
        let point = 10 + i * 4;
        let _ = writeln!(
            text,
            "#{}=IFCCARTESIANPOINT(({}.,{}.5,0.));\n#{}=IFCAXIS2PLACEMENT3D(#{},$,$);\n\
             #{}=IFCLOCALPLACEMENT(#3,#{});\n\
             #{}=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wall {}',$,$,#{},$,$,.STANDARD.);",
            point,
            i,
            i,
            point + 1,
            point,
            point + 2,
            point + 1,
            point + 3,
            i,
            point + 2
        );
        contained.push(format!("#{}", point + 3));
    }
    let _ = writeln!(
        text,
        "#5=IFCRELCONTAINEDINSPATIALSTRUCTURE('3Agm079vPIYBL4JExVrhD5',$,$,$,({}),#4);",
        contained.join(",")
    );
    text.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
    text
}

fn read_model(c: &mut Criterion) {
    let content = generated_file(2_000);
    let reader = StepReader::new();
    c.bench_function("read_2000_walls", |b| {
        b.iter(|| reader.read_with_report(black_box(&content), None))
    });
}

fn write_model(c: &mut Criterion) {
    let content = generated_file(2_000);
    let model = ifc_step_parser::read(&content).expect("generated file reads");
    let writer = StepWriter::new();
    c.bench_function("write_2000_walls", |b| b.iter(|| writer.write(black_box(&model))));
}

criterion_group!(benches, read_model, write_model);
criterion_main!(benches);
